//! Clipboard stamps and the clock they are read from
//!
//! Every outbound write carries a synthetic item of a private MIME type whose
//! payload is the write time. When the host clipboard is read back, an equal
//! or older stamp means the content is our own echo.

use chrono::{DateTime, NaiveDateTime, Utc};
use colorlink_engine::{ClipboardItem, MimeType};
use std::fmt;

/// Text format of a stamp: RFC 3339 in UTC with nanoseconds
pub const STAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.9fZ";

/// Wall clock
pub trait Clock: Send + Sync {
    /// Current time
    fn now(&self) -> DateTime<Utc>;
}

/// [`Clock`] reading the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Time of an outbound write
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Stamp(DateTime<Utc>);

impl Stamp {
    /// Stamp at a point in time
    #[inline]
    #[must_use]
    pub const fn new(at: DateTime<Utc>) -> Self {
        Self(at)
    }

    /// Stamp from `clock`, never earlier than `previous`
    #[must_use]
    pub fn next(clock: &dyn Clock, previous: Option<Self>) -> Self {
        let now = Self(clock.now());
        match previous {
            Some(previous) if previous > now => previous,
            _ => now,
        }
    }

    /// Point in time
    #[inline]
    #[must_use]
    pub const fn time(&self) -> DateTime<Utc> {
        self.0
    }

    /// Parse the stamp text format
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        NaiveDateTime::parse_from_str(text.trim(), STAMP_FORMAT)
            .ok()
            .map(|naive| Self(naive.and_utc()))
    }

    /// Clipboard item carrying this stamp
    #[must_use]
    pub fn to_item(&self, mime_type: &MimeType) -> ClipboardItem {
        ClipboardItem::text(mime_type.clone(), self.to_string())
    }
}

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(STAMP_FORMAT))
    }
}

/// Stamp found on the host clipboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostStamp {
    /// No stamp item
    Missing,
    /// Stamp item whose payload is not a stamp
    Unparseable,
    /// Valid stamp
    Present(Stamp),
}

impl HostStamp {
    /// Find the stamp item of `mime_type` among `items`
    #[must_use]
    pub fn find(items: &[ClipboardItem], mime_type: &MimeType) -> Self {
        match items.iter().find(|item| &item.mime_type == mime_type) {
            None => Self::Missing,
            Some(item) => item
                .as_text()
                .and_then(Stamp::parse)
                .map_or(Self::Unparseable, Self::Present),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    struct Fixed(DateTime<Utc>);

    impl Clock for Fixed {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn at(secs: i64, nanos: u32) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, nanos).single().unwrap()
    }

    #[test]
    fn format_has_nanoseconds() {
        let stamp = Stamp::new(at(1_700_000_000, 5));
        assert_eq!(stamp.to_string(), "2023-11-14T22:13:20.000000005Z");
        assert_eq!(Stamp::parse(&stamp.to_string()), Some(stamp));
    }

    #[test]
    fn next_never_goes_back() {
        let later = Stamp::new(at(200, 0));
        let clock = Fixed(at(100, 0));
        assert_eq!(Stamp::next(&clock, Some(later)), later);
        assert_eq!(Stamp::next(&clock, None), Stamp::new(at(100, 0)));
        assert_eq!(
            Stamp::next(&Fixed(at(300, 0)), Some(later)),
            Stamp::new(at(300, 0))
        );
    }

    #[test]
    fn host_stamp_lookup() {
        let mime = MimeType::Other("application/x-colorlink-stamp".into());
        let stamp = Stamp::new(at(10, 0));

        assert_eq!(HostStamp::find(&[], &mime), HostStamp::Missing);
        assert_eq!(
            HostStamp::find(&[stamp.to_item(&mime)], &mime),
            HostStamp::Present(stamp)
        );
        assert_eq!(
            HostStamp::find(&[ClipboardItem::text(mime.clone(), "yesterday")], &mime),
            HostStamp::Unparseable
        );
        assert_eq!(
            HostStamp::find(&[ClipboardItem::binary(mime.clone(), vec![1, 2])], &mime),
            HostStamp::Unparseable
        );
    }

    proptest! {
        #[test]
        fn text_order_matches_time_order(a in 0i64..4_000_000_000, b in 0i64..4_000_000_000, na in 0u32..1_000_000_000, nb in 0u32..1_000_000_000) {
            let x = Stamp::new(at(a, na));
            let y = Stamp::new(at(b, nb));
            prop_assert_eq!(x.cmp(&y), x.to_string().cmp(&y.to_string()));
            prop_assert_eq!(Stamp::parse(&x.to_string()), Some(x));
        }
    }
}
