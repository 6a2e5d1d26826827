pub mod compare;
pub mod sensitivity;
