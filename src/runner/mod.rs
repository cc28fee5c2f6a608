pub mod autoload;
pub mod ds;
