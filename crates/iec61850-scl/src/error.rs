// crates/iec61850-scl/src/error.rs

use base64::DecodeError;
use hex::FromHexError;
use quick_xml::errors::serialize::DeError;
use std::fmt;
use std::io;
use std::num::{ParseFloatError, ParseIntError};

/// Errors that can occur while loading, resolving or compiling an SCL document.
#[derive(Debug)]
pub enum SclError {
    /// An error from the underlying `quick-xml` deserializer.
    XmlParsing(DeError),

    /// Reading the SCL file or writing the generated files failed.
    Io(io::Error),

    /// An `Octet64` literal was not valid base64.
    Base64Decoding(DecodeError),

    /// A MAC address octet was not valid hex.
    HexParsing(FromHexError),

    /// A numeric literal could not be parsed.
    InvalidNumber(String),

    /// An error occurred while formatting the generated C code.
    FmtError(fmt::Error),

    /// A required XML element was missing (e.g., DataTypeTemplates).
    MissingElement { element: &'static str },

    /// A required child element was missing below the named element.
    MissingChildElement {
        parent: String,
        element: &'static str,
    },

    /// A required attribute was missing on the named element.
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },

    /// An attribute had a value outside its allowed set or format.
    InvalidAttributeFormat {
        element: String,
        attribute: &'static str,
        value: String,
    },

    /// A node references a type id that no template declares.
    MissingTypeDeclaration { type_id: String, node: String },

    /// A type id resolves to a template of the wrong family.
    WrongTemplateKind {
        type_id: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A template (transitively) contains itself.
    CyclicType { chain: Vec<String> },

    /// The `bType` of an attribute definition is not supported.
    UnsupportedAttributeType { b_type: String },

    /// A literal was given for a type that has no value interpretation.
    UnsupportedValueType { attribute_type: &'static str },

    /// A literal could not be interpreted as its declared type.
    InvalidValue {
        attribute_type: &'static str,
        value: String,
        reason: String,
    },

    /// A DOI names a data object the logical node type does not declare.
    UnknownDataObject { node: String, name: String },

    /// A DAI or SDI names a child the data object type does not declare.
    UnknownDataAttribute { node: String, name: String },

    /// A communication `P` element carried an unusable value.
    InvalidAddress { parameter: &'static str, value: String },

    /// The requested IED is not present in the document.
    IedNotFound { name: Option<String> },

    /// The requested access point is not present on the IED.
    AccessPointNotFound { ied: String, name: Option<String> },

    /// A generic validation error.
    ValidationError(String),
}

impl From<DeError> for SclError {
    fn from(e: DeError) -> Self {
        SclError::XmlParsing(e)
    }
}

impl From<io::Error> for SclError {
    fn from(e: io::Error) -> Self {
        SclError::Io(e)
    }
}

impl From<DecodeError> for SclError {
    fn from(e: DecodeError) -> Self {
        SclError::Base64Decoding(e)
    }
}

impl From<FromHexError> for SclError {
    fn from(e: FromHexError) -> Self {
        SclError::HexParsing(e)
    }
}

impl From<fmt::Error> for SclError {
    fn from(e: fmt::Error) -> Self {
        SclError::FmtError(e)
    }
}

impl From<ParseIntError> for SclError {
    fn from(e: ParseIntError) -> Self {
        SclError::InvalidNumber(e.to_string())
    }
}

impl From<ParseFloatError> for SclError {
    fn from(e: ParseFloatError) -> Self {
        SclError::InvalidNumber(e.to_string())
    }
}

impl fmt::Display for SclError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SclError::XmlParsing(e) => write!(f, "XML parsing error: {}", e),
            SclError::Io(e) => write!(f, "I/O error: {}", e),
            SclError::Base64Decoding(e) => write!(f, "Base64 decoding error: {}", e),
            SclError::HexParsing(e) => write!(f, "Hex parsing error: {}", e),
            SclError::InvalidNumber(e) => write!(f, "Invalid number: {}", e),
            SclError::FmtError(e) => write!(f, "Formatting error: {}", e),
            SclError::MissingElement { element } => {
                write!(f, "Missing required XML element: {}", element)
            }
            SclError::MissingChildElement { parent, element } => {
                write!(f, "Missing required XML element {} in {}", element, parent)
            }
            SclError::MissingAttribute { element, attribute } => {
                write!(f, "Missing required attribute {} on {}", attribute, element)
            }
            SclError::InvalidAttributeFormat {
                element,
                attribute,
                value,
            } => write!(
                f,
                "Invalid value \"{}\" for attribute {} on {}",
                value, attribute, element
            ),
            SclError::MissingTypeDeclaration { type_id, node } => {
                write!(f, "Missing type declaration {} for {}", type_id, node)
            }
            SclError::WrongTemplateKind {
                type_id,
                expected,
                found,
            } => write!(
                f,
                "Type {} is a {} but a {} was expected",
                type_id, found, expected
            ),
            SclError::CyclicType { chain } => {
                write!(f, "Cyclic type definition: {}", chain.join(" -> "))
            }
            SclError::UnsupportedAttributeType { b_type } => {
                write!(f, "Unsupported attribute type: {}", b_type)
            }
            SclError::UnsupportedValueType { attribute_type } => {
                write!(f, "Unsupported type {} for value initialization", attribute_type)
            }
            SclError::InvalidValue {
                attribute_type,
                value,
                reason,
            } => write!(
                f,
                "Invalid {} value \"{}\": {}",
                attribute_type, value, reason
            ),
            SclError::UnknownDataObject { node, name } => {
                write!(f, "Missing data object {} in {}", name, node)
            }
            SclError::UnknownDataAttribute { node, name } => {
                write!(f, "Missing data attribute {} in {}", name, node)
            }
            SclError::InvalidAddress { parameter, value } => {
                write!(f, "Invalid {} address parameter: {}", parameter, value)
            }
            SclError::IedNotFound { name: Some(name) } => write!(f, "IED {} not found", name),
            SclError::IedNotFound { name: None } => write!(f, "No IED found in SCL document"),
            SclError::AccessPointNotFound {
                ied,
                name: Some(name),
            } => write!(f, "Access point {} not found on IED {}", name, ied),
            SclError::AccessPointNotFound { ied, name: None } => {
                write!(f, "IED {} has no access point", ied)
            }
            SclError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for SclError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SclError::XmlParsing(e) => Some(e),
            SclError::Io(e) => Some(e),
            SclError::Base64Decoding(e) => Some(e),
            SclError::HexParsing(e) => Some(e),
            SclError::FmtError(e) => Some(e),
            _ => None,
        }
    }
}
