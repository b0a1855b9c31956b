//! Helpers for presenting transactions to people, e.g. in the seed report or
//! a client that renders the API's data.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};
use time::{OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};
use unicode_segmentation::UnicodeSegmentation;

use crate::transaction::Category;

/// Format `amount` as US dollars with two decimal places and thousands
/// separators, e.g. "$1,234.50" or "-$8.50".
pub fn format_currency(amount: f64) -> String {
    static POSITIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();
    static NEGATIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("$")
            .ok()
            .map(|formatter| formatter.precision(Precision::Decimals(2)))
    });
    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-$")
            .ok()
            .map(|formatter| formatter.precision(Precision::Decimals(2)))
    });

    let formatted_string = if amount < 0.0 {
        negative_fmt
            .as_ref()
            .map(|formatter| formatter.fmt_string(amount.abs()))
    } else if amount > 0.0 {
        positive_fmt
            .as_ref()
            .map(|formatter| formatter.fmt_string(amount))
    } else {
        // numfmt renders zero as "0"
        Some("$0.00".to_owned())
    };

    let Some(mut formatted_string) = formatted_string else {
        return fallback_currency(amount);
    };

    // numfmt drops trailing zeros, e.g. "12.30" comes out as "12.3".
    match formatted_string.find('.') {
        Some(point) => {
            let decimals = formatted_string.len() - point - 1;
            formatted_string.extend(std::iter::repeat_n('0', 2usize.saturating_sub(decimals)));
        }
        None => formatted_string.push_str(".00"),
    }

    formatted_string
}

fn fallback_currency(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${amount:.2}")
    }
}

const DISPLAY_DATE: &[BorrowedFormatItem<'static>] =
    format_description!("[month repr:short] [day], [year]");
const INPUT_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Format `date` for display, e.g. "Jan 28, 2024" or "Jan 05, 2024".
pub fn format_date(date: OffsetDateTime) -> String {
    date.format(DISPLAY_DATE)
        .unwrap_or_else(|_| date.date().to_string())
}

/// Format `date` as the value of an HTML date input, e.g. "2024-01-28".
pub fn format_date_for_input(date: OffsetDateTime) -> String {
    date.format(INPUT_DATE)
        .unwrap_or_else(|_| date.date().to_string())
}

/// The Tailwind CSS classes for a badge showing `category`.
pub fn category_color(category: Category) -> &'static str {
    match category {
        Category::Food => "bg-orange-100 text-orange-800",
        Category::Transport => "bg-blue-100 text-blue-800",
        Category::Entertainment => "bg-purple-100 text-purple-800",
        Category::Shopping => "bg-pink-100 text-pink-800",
        Category::Bills => "bg-red-100 text-red-800",
        Category::Healthcare => "bg-green-100 text-green-800",
        Category::Education => "bg-indigo-100 text-indigo-800",
        Category::Other => "bg-gray-100 text-gray-800",
    }
}

/// An emoji representing `category`.
pub fn category_icon(category: Category) -> &'static str {
    match category {
        Category::Food => "🍽️",
        Category::Transport => "🚗",
        Category::Entertainment => "🎬",
        Category::Shopping => "🛍️",
        Category::Bills => "📄",
        Category::Healthcare => "🏥",
        Category::Education => "📚",
        Category::Other => "📦",
    }
}

/// Shorten `text` to at most `max_length` user-perceived characters,
/// marking the cut with "...".
///
/// Text that already fits is returned unchanged.
pub fn truncate_text(text: &str, max_length: usize) -> String {
    let graphemes: Vec<&str> = text.graphemes(true).collect();

    if graphemes.len() <= max_length {
        return text.to_owned();
    }

    let mut truncated = graphemes[..max_length].concat();
    truncated.push_str("...");
    truncated
}

/// `value` as a whole-number percentage of `total`, or 0 when `total` is zero.
pub fn calculate_percentage(value: f64, total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }

    (value / total * 100.0).round()
}
