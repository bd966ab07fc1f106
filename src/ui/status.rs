//! Text sources for the status widgets.
//!
//! Everything here parses plain text: /proc files, amixer output, clock
//! formats. The parsers are separated from the sampling so they can be fed
//! captured samples in tests.

use std::fs;
use std::process::Command;
use std::time::Instant;

use chrono::Local;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CpuSample {
    idle: u64,
    total: u64,
}

#[derive(Clone, Copy)]
struct NetSample {
    rx: u64,
    tx: u64,
    at: Instant,
}

/// Holds the previous samples the rate-based widgets need.
pub struct StatusSampler {
    prev_cpu: Option<CpuSample>,
    prev_net: Option<NetSample>,
}

impl Default for StatusSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusSampler {
    pub fn new() -> Self {
        Self {
            prev_cpu: None,
            prev_net: None,
        }
    }

    /// CPU frequency and load, e.g. `3.4GHz 12%`. The first call reports 0%
    /// load since there is no previous sample to diff against.
    pub fn cpu_text(&mut self) -> String {
        let ghz = fs::read_to_string("/proc/cpuinfo")
            .ok()
            .and_then(|s| parse_cpu_ghz(&s))
            .unwrap_or(0.0);

        let sample = fs::read_to_string("/proc/stat")
            .ok()
            .and_then(|s| parse_cpu_sample(&s));

        let load = match (self.prev_cpu, sample) {
            (Some(prev), Some(cur)) => cpu_load_percent(prev, cur),
            _ => 0,
        };
        if sample.is_some() {
            self.prev_cpu = sample;
        }

        format!("{:.1}GHz {}%", ghz, load)
    }

    /// Used memory, e.g. `3012M`.
    pub fn memory_text(&self) -> String {
        let used = fs::read_to_string("/proc/meminfo")
            .ok()
            .and_then(|s| parse_mem_used_mib(&s))
            .unwrap_or(0);
        format!("{}M", used)
    }

    /// Receive/transmit rate of `interface`, e.g. `12kB ↓↑ 3kB`.
    pub fn net_text(&mut self, interface: &str) -> String {
        let bytes = fs::read_to_string("/proc/net/dev")
            .ok()
            .and_then(|s| parse_net_bytes(&s, interface));

        let Some((rx, tx)) = bytes else {
            return format!("{}?", interface);
        };

        let now = Instant::now();
        let text = match self.prev_net {
            Some(prev) => {
                let secs = now.duration_since(prev.at).as_secs_f64().max(0.001);
                format!(
                    "{} ↓↑ {}",
                    humanize_rate(rx.saturating_sub(prev.rx) as f64 / secs),
                    humanize_rate(tx.saturating_sub(prev.tx) as f64 / secs),
                )
            }
            None => String::from("0B ↓↑ 0B"),
        };

        self.prev_net = Some(NetSample { rx, tx, at: now });
        text
    }

    /// Master volume from amixer, e.g. `80%`, or `M` when muted.
    pub fn volume_text(&self) -> String {
        Command::new("amixer")
            .args(["sget", "Master"])
            .output()
            .ok()
            .and_then(|out| parse_volume(&String::from_utf8_lossy(&out.stdout)))
            .unwrap_or_else(|| String::from("?"))
    }

    /// Local time rendered with a strftime format.
    pub fn clock_text(&self, format: &str) -> String {
        Local::now().format(format).to_string()
    }
}

/// Idle and total jiffies from the aggregate `cpu` line of /proc/stat.
fn parse_cpu_sample(stat: &str) -> Option<CpuSample> {
    let line = stat.lines().find(|l| l.starts_with("cpu "))?;
    let fields: Vec<u64> = line
        .split_whitespace()
        .skip(1)
        .take(8)
        .filter_map(|f| f.parse().ok())
        .collect();
    if fields.len() < 5 {
        return None;
    }

    let idle = fields[3] + fields[4];
    let total = fields.iter().sum();
    Some(CpuSample { idle, total })
}

fn cpu_load_percent(prev: CpuSample, cur: CpuSample) -> u64 {
    let total = cur.total.saturating_sub(prev.total);
    let idle = cur.idle.saturating_sub(prev.idle);
    if total == 0 {
        return 0;
    }
    (total.saturating_sub(idle)) * 100 / total
}

/// First `cpu MHz` entry of /proc/cpuinfo, in GHz.
fn parse_cpu_ghz(cpuinfo: &str) -> Option<f64> {
    let line = cpuinfo.lines().find(|l| l.starts_with("cpu MHz"))?;
    let mhz: f64 = line.split(':').nth(1)?.trim().parse().ok()?;
    Some(mhz / 1000.0)
}

/// Used memory in MiB (MemTotal - MemAvailable).
fn parse_mem_used_mib(meminfo: &str) -> Option<u64> {
    let field = |name: &str| -> Option<u64> {
        meminfo
            .lines()
            .find(|l| l.starts_with(name))?
            .split_whitespace()
            .nth(1)?
            .parse()
            .ok()
    };

    let total = field("MemTotal:")?;
    let available = field("MemAvailable:")?;
    Some(total.saturating_sub(available) / 1024)
}

/// Cumulative (rx, tx) byte counters for `interface` from /proc/net/dev.
fn parse_net_bytes(netdev: &str, interface: &str) -> Option<(u64, u64)> {
    for line in netdev.lines() {
        let line = line.trim_start();
        let Some(rest) = line.strip_prefix(interface) else {
            continue;
        };
        let Some(rest) = rest.strip_prefix(':') else {
            continue;
        };

        let fields: Vec<&str> = rest.split_whitespace().collect();
        let rx = fields.first()?.parse().ok()?;
        let tx = fields.get(8)?.parse().ok()?;
        return Some((rx, tx));
    }
    None
}

/// Volume percentage from `amixer sget` output; `M` when the control is off.
fn parse_volume(output: &str) -> Option<String> {
    let line = output.lines().find(|l| l.contains('%'))?;
    if line.contains("[off]") {
        return Some(String::from("M"));
    }

    let start = line.find('[')? + 1;
    let end = line[start..].find(']')? + start;
    Some(line[start..end].to_string())
}

fn humanize_rate(bytes_per_sec: f64) -> String {
    if bytes_per_sec >= 1_000_000.0 {
        format!("{:.1}MB", bytes_per_sec / 1_000_000.0)
    } else if bytes_per_sec >= 1_000.0 {
        format!("{:.0}kB", bytes_per_sec / 1_000.0)
    } else {
        format!("{:.0}B", bytes_per_sec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAT: &str = "cpu  10332 0 4567 89000 1000 0 230 0 0 0\n\
                        cpu0 5166 0 2283 44500 500 0 115 0 0 0\n";

    #[test]
    fn cpu_sample_sums_idle_and_total() {
        let s = parse_cpu_sample(STAT).unwrap();
        assert_eq!(s.idle, 89000 + 1000);
        assert_eq!(s.total, 10332 + 4567 + 89000 + 1000 + 230);
    }

    #[test]
    fn cpu_load_is_the_busy_share_of_the_delta() {
        let prev = CpuSample {
            idle: 1000,
            total: 2000,
        };
        let cur = CpuSample {
            idle: 1600,
            total: 3000,
        };
        // 1000 jiffies passed, 600 idle -> 40% busy.
        assert_eq!(cpu_load_percent(prev, cur), 40);
        assert_eq!(cpu_load_percent(cur, cur), 0);
    }

    #[test]
    fn cpu_ghz_comes_from_the_first_core() {
        let cpuinfo = "processor\t: 0\ncpu MHz\t\t: 3392.145\nprocessor\t: 1\ncpu MHz\t\t: 1200.000\n";
        assert_eq!(parse_cpu_ghz(cpuinfo), Some(3.392145));
    }

    #[test]
    fn mem_used_subtracts_available() {
        let meminfo = "MemTotal:       16315580 kB\n\
                       MemFree:         1178288 kB\n\
                       MemAvailable:   12345344 kB\n";
        assert_eq!(parse_mem_used_mib(meminfo), Some((16315580 - 12345344) / 1024));
    }

    #[test]
    fn net_bytes_picks_the_named_interface() {
        let netdev = "Inter-|   Receive                                                |  Transmit\n\
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed\n\
    lo:  123456     789    0    0    0     0          0         0   123456     789    0    0    0     0       0          0\n\
  enp44s0: 987654321  54321    0    0    0     0          0         0 12345678   4321    0    0    0     0       0          0\n";
        assert_eq!(parse_net_bytes(netdev, "enp44s0"), Some((987654321, 12345678)));
        assert_eq!(parse_net_bytes(netdev, "lo"), Some((123456, 123456)));
        assert_eq!(parse_net_bytes(netdev, "wlan0"), None);
    }

    #[test]
    fn volume_reads_percentage_and_mute() {
        let on = "Simple mixer control 'Master',0\n\
                  Front Left: Playback 52428 [80%] [on]\n";
        assert_eq!(parse_volume(on), Some(String::from("80%")));

        let off = "Front Left: Playback 52428 [80%] [off]\n";
        assert_eq!(parse_volume(off), Some(String::from("M")));

        assert_eq!(parse_volume("no percentages here"), None);
    }

    #[test]
    fn rates_humanize_by_magnitude() {
        assert_eq!(humanize_rate(512.0), "512B");
        assert_eq!(humanize_rate(15_360.0), "15kB");
        assert_eq!(humanize_rate(2_400_000.0), "2.4MB");
    }

    #[test]
    fn clock_formats_a_fixed_timestamp() {
        use chrono::NaiveDate;
        let dt = NaiveDate::from_ymd_opt(2021, 3, 7)
            .unwrap()
            .and_hms_opt(14, 5, 0)
            .unwrap();
        assert_eq!(dt.format("%B %d - %H:%M").to_string(), "March 07 - 14:05");
    }
}
