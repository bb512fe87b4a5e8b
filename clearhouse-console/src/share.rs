//! Messaging hand-off
//!
//! Builds the preformatted invoice summaries and the deep link that
//! opens them in the client's messaging app. Fire-and-forget: nothing
//! here awaits a response.

use std::sync::OnceLock;

use regex::Regex;

use shared::models::{AssessmentRecord, DutyRecord, SystemConfig};
use shared::util;

fn non_digits() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\D").expect("valid pattern"))
}

/// Group an amount with thousands separators the way the ledgers
/// display money; whole amounts drop the decimals.
pub fn format_amount(amount: f64) -> String {
    let negative = amount < 0.0;
    let rounded = (amount.abs() * 100.0).round() / 100.0;
    let whole = rounded.trunc() as i64;
    let fraction = ((rounded - rounded.trunc()) * 100.0).round() as i64;

    let digits = whole.to_string();
    let mut grouped = String::new();
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if fraction != 0 {
        out.push_str(&format!(".{fraction:02}"));
    }
    out
}

/// Duty invoice summary in the agreed message format
pub fn duty_invoice_summary(records: &[&DutyRecord], config: &SystemConfig) -> String {
    let Some(first) = records.first() else {
        return String::new();
    };
    let total: f64 = records.iter().map(|r| r.duty).sum();

    let mut msg = String::from("*INVOICE SUMMARY*\n");
    msg.push_str("--------------------------------\n");
    msg.push_str(&format!("*Agency:* {}\n", config.agency_name));
    msg.push_str(&format!("*Client:* {}\n", first.client_name));
    msg.push_str(&format!("*Date:* {}\n", util::today()));
    msg.push_str("--------------------------------\n\n");

    for (idx, record) in records.iter().enumerate() {
        msg.push_str(&format!(
            "{}. *B/E:* {}\n    *Amount:* \u{9f3}{}\n\n",
            idx + 1,
            record.be_year,
            format_amount(record.duty)
        ));
    }

    msg.push_str("--------------------------------\n");
    msg.push_str(&format!("*TOTAL PAYABLE:* \u{9f3}{}\n", format_amount(total)));
    msg.push_str("--------------------------------\n");
    msg.push_str("Thank you for your business.");
    msg
}

/// Assessment bill summary in the agreed message format
pub fn assessment_invoice_summary(records: &[&AssessmentRecord], config: &SystemConfig) -> String {
    let Some(first) = records.first() else {
        return String::new();
    };
    let total: f64 = records.iter().map(|r| r.net).sum();

    let mut msg = String::from("*ASSESSMENT BILL SUMMARY*\n");
    msg.push_str("--------------------------------\n");
    msg.push_str(&format!("*Agency:* {}\n", config.agency_name));
    msg.push_str(&format!("*Client:* {}\n", first.client_name));
    msg.push_str(&format!("*Date:* {}\n", util::today()));
    msg.push_str("--------------------------------\n\n");

    for (idx, record) in records.iter().enumerate() {
        msg.push_str(&format!(
            "{}. *Qty:* {} B/E\n    *Rate:* \u{9f3}{}\n    *Amount:* \u{9f3}{}\n\n",
            idx + 1,
            record.nos_of_be,
            format_amount(record.rate),
            format_amount(record.net)
        ));
    }

    msg.push_str("--------------------------------\n");
    msg.push_str(&format!("*TOTAL PAYABLE:* \u{9f3}{}\n", format_amount(total)));
    msg.push_str("--------------------------------\n");
    msg
}

/// Deep link opening the message for the given phone number. None when
/// the number has no digits to dial.
pub fn whatsapp_link(phone: &str, message: &str) -> Option<String> {
    let digits = non_digits().replace_all(phone, "");
    if digits.is_empty() {
        return None;
    }
    Some(format!(
        "https://wa.me/{}?text={}",
        digits,
        urlencoding::encode(message)
    ))
}
