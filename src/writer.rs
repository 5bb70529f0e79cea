use std::fs::{self};
use std::path::PathBuf;

use crate::plan::DeploymentPlan;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to serialize the plan: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write {0}: {1}")]
    Io(String, #[source] std::io::Error),
}

pub fn write(path: &PathBuf, plan: &DeploymentPlan) -> Result<(), Error> {
    let file_contents = serde_json::to_string_pretty(plan)?;

    return match fs::write(path, file_contents) {
        Ok(_) => Ok(()),
        Err(error) => Err(Error::Io(path.display().to_string(), error)),
    };
}
