#![deny(warnings)]
pub mod belief;
pub mod game;
pub mod model;

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "mascarade"
    }

    pub const fn codename() -> &'static str {
        "Masked Ledger"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}

#[cfg(test)]
mod tests {
    use super::AppInfo;

    #[test]
    fn exposes_static_metadata() {
        assert_eq!(AppInfo::name(), "mascarade");
        assert_eq!(AppInfo::codename(), "Masked Ledger");
        assert!(!AppInfo::version().is_empty());
    }
}
