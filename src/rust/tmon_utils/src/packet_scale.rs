/// Scale a byte count into a human-readable string (B, KB, MB, GB).
pub fn scale_bytes(n: u64) -> String {
    if n > 1_000_000_000 {
        format!("{:.2} GB", n as f32 / 1_000_000_000.0)
    } else if n > 1_000_000 {
        format!("{:.2} MB", n as f32 / 1_000_000.0)
    } else if n > 1_000 {
        format!("{:.2} KB", n as f32 / 1_000.0)
    } else {
        format!("{n} B")
    }
}

/// Scale a bytes-per-second rate into bits per second, human-readable.
pub fn scale_bits(bytes_per_second: f32) -> String {
    let n = bytes_per_second * 8.0;
    if n > 1_000_000_000.0 {
        format!("{:.2} gbit/s", n / 1_000_000_000.0)
    } else if n > 1_000_000.0 {
        format!("{:.2} mbit/s", n / 1_000_000.0)
    } else if n > 1_000.0 {
        format!("{:.2} kbit/s", n / 1_000.0)
    } else {
        format!("{n:.0} bit/s")
    }
}

/// Scale a packet count into a human-readable string.
pub fn scale_packets(n: u64) -> String {
    if n > 1_000_000_000 {
        format!("{:.2} G packets", n as f32 / 1_000_000_000.0)
    } else if n > 1_000_000 {
        format!("{:.2} M packets", n as f32 / 1_000_000.0)
    } else if n > 1_000 {
        format!("{:.2} K packets", n as f32 / 1_000.0)
    } else {
        format!("{n} packets")
    }
}
