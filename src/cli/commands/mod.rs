pub mod decode;
pub mod dump;
pub mod inspect;
