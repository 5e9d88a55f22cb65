pub mod baby;
pub mod record;
