pub mod aggregate;
pub mod bundles;
pub mod deps;
pub mod module;

use chrono::{DateTime, Utc};
use std::time::SystemTime;

/// Render a timestamp the way `Last-Modified` headers expect it.
pub(crate) fn http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn http_date_formats_epoch() {
        let date = http_date(SystemTime::UNIX_EPOCH + Duration::from_secs(86_400));
        assert_eq!(date, "Fri, 02 Jan 1970 00:00:00 GMT");
    }
}
