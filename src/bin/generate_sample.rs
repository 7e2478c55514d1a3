//! Writes the built-in benchmark table to a CSV file, for exercising the
//! dashboard's upload path:
//!
//! ```text
//! cargo run --bin generate_sample -- sample_benchmarks.csv
//! ```

use anyhow::{Context, Result};

const HEADERS: [&str; 9] = [
    "Protocol",
    "Key Exchange Time (ms)",
    "Encryption Time (ms)",
    "Decryption Time (ms)",
    "Key Size (Bytes)",
    "Resource Usage (MB)",
    "Security Score (/10)",
    "Anonymity Level",
    "Quantum Resistance",
];

#[rustfmt::skip]
const ROWS: [[&str; 9]; 16] = [
    ["RSA 2048",           "120", "95",  "90",  "256",     "15",  "5",   "Medium",    "Low"],
    ["RSA 4096",           "230", "185", "180", "512",     "30",  "6",   "Medium",    "Low"],
    ["ECC",                "85",  "70",  "68",  "128",     "12",  "6",   "Medium",    "Low"],
    ["AES-256",            "30",  "12",  "10",  "32",      "10",  "7",   "Medium",    "Low"],
    ["ML-KEM (Kyber)",     "20",  "18",  "15",  "800",     "40",  "9.2", "High",      "High"],
    ["ML-DSA (Dilithium)", "25",  "22",  "21",  "1600",    "60",  "9.5", "High",      "High"],
    ["SLH-DSA (SPHINCS+)", "45",  "38",  "40",  "4100",    "120", "9.3", "High",      "Very High"],
    ["NTRU",               "33",  "20",  "19",  "1087",    "38",  "8.8", "High",      "High"],
    ["McEliece",           "50",  "55",  "52",  "1357824", "200", "9.7", "High",      "Very High"],
    ["Rainbow",            "35",  "25",  "27",  "1280",    "50",  "8.5", "High",      "High"],
    ["Falcon",             "12",  "11",  "10",  "1056",    "33",  "9",   "High",      "Ultra High"],
    ["QKD - BB84",         "14",  "13",  "12",  "1100",    "35",  "9.2", "Very High", "Ultimate"],
    ["QKD - E91",          "15",  "13",  "11",  "1000",    "36",  "9.1", "Very High", "Ultimate"],
    ["QKD - B92",          "18",  "15",  "13",  "1024",    "38",  "9.3", "Very High", "Ultimate"],
    ["QKD - SARG04",       "22",  "16",  "14",  "1088",    "37",  "9.4", "Very High", "Ultimate"],
    ["QKD - COW",          "20",  "15",  "13",  "1072",    "39",  "9.5", "Very High", "Ultimate"],
];

fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_benchmarks.csv".to_string());

    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("creating {path}"))?;
    writer.write_record(HEADERS).context("writing header")?;
    for row in ROWS {
        writer.write_record(row).context("writing row")?;
    }
    writer.flush().context("flushing CSV")?;

    println!("Wrote {} protocols to {path}", ROWS.len());
    Ok(())
}
