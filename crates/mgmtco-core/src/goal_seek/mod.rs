pub mod bisect;
pub mod runway;
