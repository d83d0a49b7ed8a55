pub mod rate_fmt;
