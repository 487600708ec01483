//! Engine descriptor files (.eng)

use std::path::Path;

use serde::Serialize;

use super::error::DescriptorError;
use crate::error::StfError;
use crate::parsing::{Handlers, Options, Reader};

/// The identifying details of an engine. Everything else an engine file
/// describes is skipped over.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Engine {
    pub name: String,
    pub description: String,
}

impl Engine {
    /// Load an engine file. The name defaults to the file's stem if the
    /// file doesn't give one.
    pub fn load(filename: &Path, options: Options) -> Result<Engine, DescriptorError> {
        let mut reader = Reader::open(filename, options)?;

        let mut engine = Engine {
            name: filename
                .file_stem()
                .map(|stem| {
                    stem.to_string_lossy()
                        .to_string()
                })
                .unwrap_or_default(),
            description: String::new(),
        };
        engine.read(&mut reader)?;

        Ok(engine)
    }

    /// Fill in fields from the given reader.
    pub fn read(&mut self, reader: &mut Reader) -> Result<(), StfError> {
        let Engine { name, description } = self;

        reader.process_file(Handlers::new().on("engine", |r| {
            r.process_block(
                Handlers::new()
                    .on("name", |r| {
                        *name = r.read_string("")?;
                        Ok(())
                    })
                    .on("description", |r| {
                        *description = r.read_string("")?;
                        Ok(())
                    }),
            )
        }))
    }
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
