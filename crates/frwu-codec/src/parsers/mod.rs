//! 码流解析器.

pub mod frwu;

pub use frwu::FrwuParser;
