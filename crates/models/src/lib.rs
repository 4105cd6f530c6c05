pub mod errors;
pub mod db;
pub mod swift_code;

#[cfg(test)]
mod tests;
