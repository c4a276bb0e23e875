pub mod identify;
pub mod providers;
pub mod result;
pub mod session;
