//! Natural-language intent table for the mock chat responder
//!
//! Intents are checked in table order against the lower-cased message; the first intent
//! with a matching phrase produces the reply. Anything unmatched gets an echo reply.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Timelike, Weekday};

use crate::logger;

/// Inputs available to a reply function
pub struct ReplyContext<'a> {
    pub message: &'a str,
    pub model: &'a str,
    /// Current time, already shifted to the reply timezone
    pub now: DateTime<FixedOffset>,
}

/// One row of the intent table
pub struct Intent {
    pub name: &'static str,
    /// Lower-case substrings, any of which selects this intent
    pub phrases: &'static [&'static str],
    pub reply: fn(&ReplyContext<'_>) -> String,
}

impl Intent {
    pub fn matches(&self, lowered: &str) -> bool {
        self.phrases.iter().any(|phrase| lowered.contains(phrase))
    }
}

pub const GREETING_REPLY: &str = "Xin chào! Tôi có thể giúp gì cho bạn?";
pub const HELP_REPLY: &str =
    "Tôi có thể giúp bạn trả lời các câu hỏi về ngày, giờ và nhiều chủ đề khác. Bạn cần hỗ trợ gì?";
pub const WEATHER_REPLY: &str =
    "Tôi không thể cung cấp thông tin thời tiết thời gian thực. Vui lòng kiểm tra ứng dụng dự báo thời tiết.";
pub const ARITHMETIC_REPLY: &str =
    "Tôi có thể giúp với các phép tính. Vui lòng hỏi cụ thể hơn, ví dụ: \"2 + 2 bằng bao nhiêu?\"";

/// Ordered intent table; earlier rows win
pub static INTENTS: &[Intent] = &[
    Intent {
        name: "weekday",
        phrases: &[
            "thứ mấy",
            "hôm nay là ngày",
            "hôm nay ngày",
            "ngày mấy",
            "ngày bao nhiêu",
            "what day",
            "which day",
        ],
        reply: weekday_reply,
    },
    Intent {
        name: "days_in_month",
        phrases: &["bao nhiêu ngày", "how many days"],
        reply: days_in_month_reply,
    },
    Intent {
        name: "time",
        phrases: &["mấy giờ", "giờ rồi", "bây giờ", "what time"],
        reply: time_reply,
    },
    Intent {
        name: "weather",
        phrases: &["thời tiết", "weather"],
        reply: weather_reply,
    },
    Intent {
        name: "greeting",
        phrases: &["xin chào", "chào bạn", "hello"],
        reply: greeting_reply,
    },
    Intent {
        name: "help",
        phrases: &["giúp", "hỗ trợ", "help"],
        reply: help_reply,
    },
    Intent {
        name: "arithmetic",
        phrases: &[
            "tính toán",
            "phép tính",
            "cộng",
            "trừ",
            "nhân",
            "chia",
            "calculate",
            "math",
        ],
        reply: arithmetic_reply,
    },
];

/// First intent whose phrases occur in `message` (case-insensitive)
pub fn match_intent(message: &str) -> Option<&'static Intent> {
    let lowered = message.to_lowercase();
    INTENTS.iter().find(|intent| intent.matches(&lowered))
}

/// Reply text for the message in `ctx`
pub fn compose_reply(ctx: &ReplyContext<'_>) -> String {
    match match_intent(ctx.message) {
        Some(intent) => {
            logger::log_debug(&format!("Chat intent matched: {}", intent.name));
            (intent.reply)(ctx)
        }
        None => echo_reply(ctx),
    }
}

/// Days in `month` of `year`: the day-of-month of the day before the 1st of next month
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    if !(1..=12).contains(&month) {
        return None;
    }
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?
        .pred_opt()
        .map(|last| last.day())
}

const fn vietnamese_weekday(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "thứ hai",
        Weekday::Tue => "thứ ba",
        Weekday::Wed => "thứ tư",
        Weekday::Thu => "thứ năm",
        Weekday::Fri => "thứ sáu",
        Weekday::Sat => "thứ bảy",
        Weekday::Sun => "chủ nhật",
    }
}

fn weekday_reply(ctx: &ReplyContext<'_>) -> String {
    let now = ctx.now;
    format!(
        "Hôm nay là {}, ngày {} tháng {} năm {}",
        vietnamese_weekday(now.weekday()),
        now.day(),
        now.month(),
        now.year()
    )
}

fn days_in_month_reply(ctx: &ReplyContext<'_>) -> String {
    let (year, month) = (ctx.now.year(), ctx.now.month());
    match days_in_month(year, month) {
        Some(days) => format!("Tháng {month} có {days} ngày"),
        None => format!("Không xác định được số ngày của tháng {month} năm {year}"),
    }
}

fn time_reply(ctx: &ReplyContext<'_>) -> String {
    format!(
        "Bây giờ là {:02}:{:02}:{:02}",
        ctx.now.hour(),
        ctx.now.minute(),
        ctx.now.second()
    )
}

fn weather_reply(_: &ReplyContext<'_>) -> String {
    WEATHER_REPLY.to_string()
}

fn greeting_reply(_: &ReplyContext<'_>) -> String {
    GREETING_REPLY.to_string()
}

fn help_reply(_: &ReplyContext<'_>) -> String {
    HELP_REPLY.to_string()
}

fn arithmetic_reply(_: &ReplyContext<'_>) -> String {
    ARITHMETIC_REPLY.to_string()
}

fn echo_reply(ctx: &ReplyContext<'_>) -> String {
    format!(
        "Tôi đã nhận được tin nhắn của bạn: \"{}\". Đây là phản hồi mô phỏng; phiên bản đầy đủ sẽ gọi mô hình {}.",
        ctx.message, ctx.model
    )
}
