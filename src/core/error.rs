use std::fmt;

/// Stable error codes surfaced to callers.
///
/// Every error carries one of these codes plus a formatted context message.
/// The string form of a code never changes between releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    LanguageNotSupported,
    InvalidSchemaType,
    SchemaValidationFailure,
    InvalidSortSchemaType,
    UnknownFilterProperty,
    InvalidFilterOperation,
    UnknownSearchableProperty,
    SortDisabled,
    UnableToSortOnUnknownField,
    ComponentMustBeFunction,
    ComponentMustBeFunctionOrArrayFunctions,
    UnsupportedComponent,
    NoLanguageWithCustomTokenizer,
    Serialization,
}

impl ErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::LanguageNotSupported => "LANGUAGE_NOT_SUPPORTED",
            ErrorKind::InvalidSchemaType => "INVALID_SCHEMA_TYPE",
            ErrorKind::SchemaValidationFailure => "SCHEMA_VALIDATION_FAILURE",
            ErrorKind::InvalidSortSchemaType => "INVALID_SORT_SCHEMA_TYPE",
            ErrorKind::UnknownFilterProperty => "UNKNOWN_FILTER_PROPERTY",
            ErrorKind::InvalidFilterOperation => "INVALID_FILTER_OPERATION",
            ErrorKind::UnknownSearchableProperty => "UNKNOWN_SEARCHABLE_PROPERTY",
            ErrorKind::SortDisabled => "SORT_DISABLED",
            ErrorKind::UnableToSortOnUnknownField => "UNABLE_TO_SORT_ON_UNKNOWN_FIELD",
            ErrorKind::ComponentMustBeFunction => "COMPONENT_MUST_BE_FUNCTION",
            ErrorKind::ComponentMustBeFunctionOrArrayFunctions => {
                "COMPONENT_MUST_BE_FUNCTION_OR_ARRAY_FUNCTIONS"
            }
            ErrorKind::UnsupportedComponent => "UNSUPPORTED_COMPONENT",
            ErrorKind::NoLanguageWithCustomTokenizer => "NO_LANGUAGE_WITH_CUSTOM_TOKENIZER",
            ErrorKind::Serialization => "SERIALIZATION",
        }
    }
}

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub context: String,
}

impl Error {
    pub fn new(kind: ErrorKind, context: impl Into<String>) -> Self {
        Error {
            kind,
            context: context.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}] {}", self.kind.code(), self.context)
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error {
            kind: ErrorKind::Serialization,
            context: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
