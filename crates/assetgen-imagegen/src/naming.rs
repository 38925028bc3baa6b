/// Leading component of every artifact name
const PREFIX: &str = "asset";

/// Artifacts are always stored as PNG
const EXTENSION: &str = "png";

/// 48 random bits, rendered as 12 hex digits
const DISCRIMINATOR_MASK: u64 = (1 << 48) - 1;

/// Produce a fresh artifact filename
///
/// Format: `asset_<unix millis>_<12 hex digits>.png`. The random suffix keeps
/// names distinct when several requests finish within the same millisecond.
pub fn generate_name() -> String {
    let millis = jiff::Timestamp::now().as_millisecond();
    let discriminator = rand::random::<u64>() & DISCRIMINATOR_MASK;

    format!("{PREFIX}_{millis}_{discriminator:012x}.{EXTENSION}")
}
