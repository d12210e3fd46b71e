//! Terminal rendering for chat lines and the catalog

use chrono::Local;
use petshop_core::{DisplayLine, FrameKind, Product};
use petshop_networking::DisplaySink;

const DEFAULT_PRODUCT_ICON: &str = "🐾";

/// Prints chat lines to stdout
#[derive(Debug, Default)]
pub struct TerminalSink;

impl DisplaySink for TerminalSink {
    fn display(&mut self, line: DisplayLine) {
        let time = Local::now().format("%H:%M:%S").to_string();
        println!("{}", format_line(&line, &time));
    }
}

fn notice_icon(kind: &FrameKind) -> &'static str {
    match kind {
        FrameKind::Success => "✅",
        FrameKind::Error => "❌",
        FrameKind::Info => "💡",
        _ => "💬",
    }
}

/// `[time] user: text` for messages, `[time] icon text` for notices
pub fn format_line(line: &DisplayLine, time: &str) -> String {
    let text = line.text.as_deref().unwrap_or_default();
    if line.is_notice() {
        format!("[{}] {} {}", time, notice_icon(&line.kind), text)
    } else {
        let user = line.username.as_deref().unwrap_or("anonymous");
        format!("[{}] {}: {}", time, user, text)
    }
}

pub fn render_products(products: &[Product]) -> String {
    if products.is_empty() {
        return "No products found".to_string();
    }

    products
        .iter()
        .map(|p| {
            let icon = p.image.as_deref().unwrap_or(DEFAULT_PRODUCT_ICON);
            format!(
                "{} {}  {}  [{}]\n    {}",
                icon,
                p.name,
                p.price,
                p.category_label(),
                p.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use petshop_core::Price;

    #[test]
    fn test_format_message_and_notice() {
        let message = DisplayLine {
            username: Some("bob".to_string()),
            text: Some("yo".to_string()),
            kind: FrameKind::Message,
        };
        assert_eq!(format_line(&message, "12:00:00"), "[12:00:00] bob: yo");

        let notice = DisplayLine::error("Connection to chat lost");
        assert_eq!(
            format_line(&notice, "12:00:01"),
            "[12:00:01] ❌ Connection to chat lost"
        );
    }

    #[test]
    fn test_render_products() {
        assert_eq!(render_products(&[]), "No products found");

        let products = vec![Product {
            id: Some(1),
            name: "Cat food".to_string(),
            description: "Nutritious".to_string(),
            price: Price(15.99),
            category: "food".to_string(),
            image: None,
        }];
        assert_eq!(
            render_products(&products),
            "🐾 Cat food  $15.99  [Food]\n    Nutritious"
        );
    }
}
