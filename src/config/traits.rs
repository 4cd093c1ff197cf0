use crate::error::SwarmError;
use serde::{Deserialize, Serialize};

/// A named, self-validating section of the configuration file.
pub trait ConfigSection: Serialize + for<'de> Deserialize<'de> + Default + Clone {
    fn section_name() -> &'static str;
    fn validate(&self) -> Result<(), SwarmError>;
}
