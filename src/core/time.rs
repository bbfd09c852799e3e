use chrono::{DateTime, FixedOffset, Local, Offset, TimeZone, Utc};

/// Clock abstracts access to the current timestamp and the viewer's zone so
/// services remain deterministic in tests.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the viewer's UTC offset in effect at `instant`.
    fn local_offset_at(&self, instant: DateTime<Utc>) -> FixedOffset;

    /// Best guess at a display name for the viewer's time zone.
    fn zone_name(&self) -> String;

    /// Converts `instant` into the viewer's local time.
    fn to_local(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.local_offset_at(instant))
    }
}

/// Real-time clock backed by the system UTC time source and local zone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn local_offset_at(&self, instant: DateTime<Utc>) -> FixedOffset {
        Local.offset_from_utc_datetime(&instant.naive_utc()).fix()
    }

    fn zone_name(&self) -> String {
        match std::env::var("TZ") {
            Ok(name) if !name.trim().is_empty() => name.trim().trim_start_matches(':').to_string(),
            _ => offset_label(self.local_offset_at(self.now())),
        }
    }
}

/// Clock frozen at a single instant in a fixed offset.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: DateTime<Utc>,
    offset: FixedOffset,
    zone_name: String,
}

impl FixedClock {
    pub fn utc(now: DateTime<Utc>) -> Self {
        Self::with_offset(now, Utc.fix(), "UTC")
    }

    pub fn with_offset(now: DateTime<Utc>, offset: FixedOffset, zone_name: &str) -> Self {
        Self {
            now,
            offset,
            zone_name: zone_name.to_string(),
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn local_offset_at(&self, _instant: DateTime<Utc>) -> FixedOffset {
        self.offset
    }

    fn zone_name(&self) -> String {
        self.zone_name.clone()
    }
}

fn offset_label(offset: FixedOffset) -> String {
    if offset.local_minus_utc() == 0 {
        "UTC".into()
    } else {
        format!("UTC{offset}")
    }
}
