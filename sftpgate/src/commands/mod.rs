pub mod check;
pub mod run;
pub mod test_host;
