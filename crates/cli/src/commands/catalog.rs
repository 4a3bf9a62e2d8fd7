use chrono::{Duration, Utc};
use libris_core::domain::book::{Book, BookId};

use crate::commands::{api_failure, block_on, CommandContext, CommandResult};

pub fn books(context: &CommandContext) -> CommandResult {
    let api = match context.api() {
        Ok(api) => api,
        Err(result) => return result,
    };

    let fetched = match block_on(async { api.list_books().await }) {
        Ok(fetched) => fetched,
        Err(result) => return result,
    };

    match fetched {
        Ok(books) => CommandResult::success(render_books_table(&books)),
        Err(error) => api_failure(error, "Failed to fetch books"),
    }
}

pub fn book(context: &CommandContext, id: &str) -> CommandResult {
    let api = match context.api() {
        Ok(api) => api,
        Err(result) => return result,
    };
    let id = BookId(id.to_string());

    let fetched = match block_on(async { api.get_book(&id).await }) {
        Ok(fetched) => fetched,
        Err(result) => return result,
    };

    match fetched {
        Ok(book) => CommandResult::success(render_book_detail(&book)),
        Err(error) => api_failure(error, "Failed to fetch book details"),
    }
}

pub fn borrow(context: &CommandContext, book_id: &str, days: i64) -> CommandResult {
    if days < 1 {
        return CommandResult::failure("The borrow period must be at least one day.", 2);
    }

    let api = match context.api() {
        Ok(api) => api,
        Err(result) => return result,
    };
    let id = BookId(book_id.to_string());
    let due_date = Utc::now() + Duration::days(days);

    let outcome = match block_on(async { api.borrow_book(&id, due_date).await }) {
        Ok(outcome) => outcome,
        Err(result) => return result,
    };

    match outcome {
        Ok(()) => CommandResult::success(format!(
            "Book borrowed successfully!\nDue date: {}",
            due_date.format("%Y-%m-%d")
        )),
        Err(error) => api_failure(error, "Failed to borrow book"),
    }
}

pub(crate) fn render_books_table(books: &[Book]) -> String {
    if books.is_empty() {
        return "No books available.".to_string();
    }

    let mut lines = Vec::with_capacity(books.len() + 1);
    let title_width = column_width("TITLE", books.iter().map(|book| book.title.as_str()));
    let author_width = column_width("AUTHOR", books.iter().map(|book| book.author.as_str()));

    lines.push(format!(
        "{:<title_width$}  {:<author_width$}  {:>10}  ID",
        "TITLE", "AUTHOR", "PRICE"
    ));
    for book in books {
        lines.push(format!(
            "{:<title_width$}  {:<author_width$}  {:>10}  {}",
            book.title,
            book.author,
            format_price(book),
            book.id
        ));
    }

    lines.join("\n")
}

pub(crate) fn render_book_detail(book: &Book) -> String {
    let mut lines = vec![book.title.clone(), format!("by {}", book.author)];

    if !book.description.is_empty() {
        lines.push(String::new());
        lines.push(book.description.clone());
    }

    lines.push(String::new());
    lines.push(format!("Price: {}", format_price(book)));
    if let Some(cover) = &book.cover_image {
        lines.push(format!("Cover: {cover}"));
    }

    lines.join("\n")
}

pub(crate) fn format_price(book: &Book) -> String {
    format!("₹{}", book.price.round_dp(2))
}

fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values.map(|value| value.chars().count()).chain([header.len()]).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use libris_core::domain::book::{Book, BookId};
    use rust_decimal::Decimal;

    use super::{render_book_detail, render_books_table};

    fn book(id: &str, title: &str, author: &str, price: Decimal) -> Book {
        Book {
            id: BookId(id.to_string()),
            title: title.to_string(),
            author: author.to_string(),
            description: String::new(),
            price,
            cover_image: None,
        }
    }

    #[test]
    fn an_empty_catalog_renders_the_empty_line() {
        assert_eq!(render_books_table(&[]), "No books available.");
    }

    #[test]
    fn the_table_lists_every_book_with_its_price() {
        let books = vec![
            book("b-1", "Pilgrim's Progress", "John Bunyan", Decimal::new(9900, 2)),
            book("b-2", "Hymns", "Various", Decimal::new(2450, 2)),
        ];

        let table = render_books_table(&books);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("TITLE"));
        assert!(lines[1].contains("Pilgrim's Progress"));
        assert!(lines[1].contains("₹99.00"));
        assert!(lines[2].contains("₹24.50"));
        assert!(lines[2].ends_with("b-2"));
    }

    #[test]
    fn the_detail_view_skips_an_empty_description() {
        let mut subject = book("b-1", "Hymns", "Various", Decimal::new(1000, 2));
        let rendered = render_book_detail(&subject);
        assert_eq!(rendered.lines().count(), 4);

        subject.description = "Collected hymns.".to_string();
        subject.cover_image = Some("/uploads/hymns.jpg".to_string());
        let rendered = render_book_detail(&subject);
        assert!(rendered.contains("Collected hymns."));
        assert!(rendered.contains("Cover: /uploads/hymns.jpg"));
    }
}
