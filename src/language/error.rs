use std::{
    fmt,
    path::{Path, PathBuf},
};

use crate::error::StfError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingError {
    pub problem: String,
    pub details: String,
    pub filename: PathBuf,
}

impl LoadingError {
    pub fn from_io(filename: &Path, error: &std::io::Error) -> LoadingError {
        match error.kind() {
            std::io::ErrorKind::NotFound => LoadingError {
                problem: "File not found".to_string(),
                details: String::new(),
                filename: filename.to_path_buf(),
            },
            std::io::ErrorKind::InvalidData => LoadingError {
                problem: "Failed reading".to_string(),
                details: "file is not valid UTF-8 text".to_string(),
                filename: filename.to_path_buf(),
            },
            _ => LoadingError {
                problem: "Failed reading".to_string(),
                details: error
                    .kind()
                    .to_string(),
                filename: filename.to_path_buf(),
            },
        }
    }
}

impl fmt::Display for LoadingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self
            .details
            .is_empty()
        {
            write!(f, "{}: {}", self.problem, self.filename.display())
        } else {
            write!(
                f,
                "{}: {}: {}",
                self.problem,
                self.filename.display(),
                self.details
            )
        }
    }
}

impl std::error::Error for LoadingError {}

/// Failure to load a descriptor, either in getting at the file or in reading
/// what it contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    Loading(LoadingError),
    Parsing(StfError),
}

impl fmt::Display for DescriptorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptorError::Loading(error) => write!(f, "{}", error),
            DescriptorError::Parsing(error) => write!(f, "{}", error),
        }
    }
}

impl std::error::Error for DescriptorError {}

impl From<LoadingError> for DescriptorError {
    fn from(error: LoadingError) -> Self {
        DescriptorError::Loading(error)
    }
}

impl From<StfError> for DescriptorError {
    fn from(error: StfError) -> Self {
        DescriptorError::Parsing(error)
    }
}
