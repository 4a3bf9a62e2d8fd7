use std::fs;
use std::path::{Path, PathBuf};

use libris_client::{ApiError, CoverUpload};
use libris_core::domain::book::{BookDraft, BookId};
use libris_core::domain::borrow::{BorrowId, BorrowRecord};
use libris_core::domain::user::{User, UserId};
use rust_decimal::Decimal;

use crate::commands::{api_failure, block_on, CommandContext, CommandResult};

pub struct AddBookArgs {
    pub title: String,
    pub author: String,
    pub description: String,
    pub price: String,
    pub cover: Option<PathBuf>,
}

pub struct EditBookArgs {
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub cover: Option<PathBuf>,
}

pub fn dashboard(context: &CommandContext) -> CommandResult {
    if let Err(result) = context.require_session() {
        return result;
    }
    let api = match context.api() {
        Ok(api) => api,
        Err(result) => return result,
    };

    let fetched = match block_on(async {
        let books = api.list_books().await?;
        let borrows = api.list_borrow_records().await?;
        let users = api.list_users().await?;
        Ok::<_, ApiError>((books, borrows, users))
    }) {
        Ok(fetched) => fetched,
        Err(result) => return result,
    };

    match fetched {
        Ok((books, borrows, users)) => {
            CommandResult::success(render_dashboard(books.len(), borrows.len(), users.len()))
        }
        Err(error) => api_failure(error, "Failed to load data"),
    }
}

pub fn add_book(context: &CommandContext, args: AddBookArgs) -> CommandResult {
    if let Err(result) = context.require_session() {
        return result;
    }
    let price = match parse_price(&args.price) {
        Ok(price) => price,
        Err(result) => return result,
    };
    let cover = match load_cover(args.cover.as_deref()) {
        Ok(cover) => cover,
        Err(result) => return result,
    };
    let api = match context.api() {
        Ok(api) => api,
        Err(result) => return result,
    };

    let draft = BookDraft {
        title: args.title,
        author: args.author,
        description: args.description,
        price,
    };

    let outcome = match block_on(async { api.create_book(&draft, cover).await }) {
        Ok(outcome) => outcome,
        Err(result) => return result,
    };

    match outcome {
        Ok(book) => CommandResult::success(format!("Added \"{}\" ({}).", book.title, book.id)),
        Err(error) => api_failure(error, "Failed to add book"),
    }
}

pub fn edit_book(context: &CommandContext, id: &str, args: EditBookArgs) -> CommandResult {
    if let Err(result) = context.require_session() {
        return result;
    }
    let price = match args.price.as_deref().map(parse_price).transpose() {
        Ok(price) => price,
        Err(result) => return result,
    };
    let cover = match load_cover(args.cover.as_deref()) {
        Ok(cover) => cover,
        Err(result) => return result,
    };
    let api = match context.api() {
        Ok(api) => api,
        Err(result) => return result,
    };
    let id = BookId(id.to_string());

    let outcome = match block_on(async {
        // The edit starts from the book's current values, the same way the
        // edit dialog pre-fills its inputs.
        let current = api.get_book(&id).await?;
        let draft = BookDraft {
            title: args.title.unwrap_or(current.title),
            author: args.author.unwrap_or(current.author),
            description: args.description.unwrap_or(current.description),
            price: price.unwrap_or(current.price),
        };
        api.update_book(&id, &draft, cover).await
    }) {
        Ok(outcome) => outcome,
        Err(result) => return result,
    };

    match outcome {
        Ok(book) => CommandResult::success(format!("Updated \"{}\".", book.title)),
        Err(error) => api_failure(error, "Failed to update book"),
    }
}

pub fn delete_book(context: &CommandContext, id: &str, yes: bool) -> CommandResult {
    if let Err(result) = context.require_session() {
        return result;
    }
    if !yes {
        return CommandResult::failure(
            "Are you sure you want to delete this book? Re-run with --yes to confirm.",
            2,
        );
    }
    let api = match context.api() {
        Ok(api) => api,
        Err(result) => return result,
    };
    let id = BookId(id.to_string());

    let outcome = match block_on(async { api.delete_book(&id).await }) {
        Ok(outcome) => outcome,
        Err(result) => return result,
    };

    match outcome {
        Ok(()) => CommandResult::success("Book deleted."),
        Err(error) => api_failure(error, "Failed to delete book"),
    }
}

pub fn borrows(context: &CommandContext) -> CommandResult {
    if let Err(result) = context.require_session() {
        return result;
    }
    let api = match context.api() {
        Ok(api) => api,
        Err(result) => return result,
    };

    let fetched = match block_on(async { api.list_borrow_records().await }) {
        Ok(fetched) => fetched,
        Err(result) => return result,
    };

    match fetched {
        Ok(records) => CommandResult::success(render_borrows_table(&records)),
        Err(error) => api_failure(error, "Failed to fetch borrow records"),
    }
}

pub fn mark_returned(context: &CommandContext, id: &str) -> CommandResult {
    if let Err(result) = context.require_session() {
        return result;
    }
    let api = match context.api() {
        Ok(api) => api,
        Err(result) => return result,
    };
    let id = BorrowId(id.to_string());

    let outcome = match block_on(async { api.mark_returned(&id).await }) {
        Ok(outcome) => outcome,
        Err(result) => return result,
    };

    match outcome {
        Ok(()) => CommandResult::success("Record marked as returned."),
        Err(error) => api_failure(error, "Failed to update record"),
    }
}

pub fn users(context: &CommandContext) -> CommandResult {
    if let Err(result) = context.require_session() {
        return result;
    }
    let api = match context.api() {
        Ok(api) => api,
        Err(result) => return result,
    };

    let fetched = match block_on(async { api.list_users().await }) {
        Ok(fetched) => fetched,
        Err(result) => return result,
    };

    match fetched {
        Ok(users) => CommandResult::success(render_users_table(&users)),
        Err(error) => api_failure(error, "Failed to fetch users"),
    }
}

pub fn set_admin(context: &CommandContext, id: &str, is_admin: bool) -> CommandResult {
    if let Err(result) = context.require_session() {
        return result;
    }
    let api = match context.api() {
        Ok(api) => api,
        Err(result) => return result,
    };
    let id = UserId(id.to_string());

    let outcome = match block_on(async { api.set_admin(&id, is_admin).await }) {
        Ok(outcome) => outcome,
        Err(result) => return result,
    };

    match outcome {
        Ok(()) => CommandResult::success(if is_admin {
            "Granted administrator rights."
        } else {
            "Revoked administrator rights."
        }),
        Err(error) => api_failure(error, "Failed to update user"),
    }
}

pub(crate) fn render_dashboard(books: usize, borrows: usize, users: usize) -> String {
    [
        "Admin Dashboard Overview".to_string(),
        format!("  Total books:    {books}"),
        format!("  Borrow records: {borrows}"),
        format!("  Total users:    {users}"),
    ]
    .join("\n")
}

pub(crate) fn render_borrows_table(records: &[BorrowRecord]) -> String {
    if records.is_empty() {
        return "No borrow records found.".to_string();
    }

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(format!(
        "{:<20}  {:<28}  {:<16}  {:<10}  {:<8}  ID",
        "USER", "BOOK", "BORROWED", "DUE", "RETURNED"
    ));
    for record in records {
        let due = record
            .due_date
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "N/A".to_string());
        lines.push(format!(
            "{:<20}  {:<28}  {:<16}  {:<10}  {:<8}  {}",
            record.borrower_name(),
            record.book_title(),
            record.borrowed_at.format("%Y-%m-%d %H:%M"),
            due,
            if record.returned { "Yes" } else { "No" },
            record.id
        ));
    }

    lines.join("\n")
}

pub(crate) fn render_users_table(users: &[User]) -> String {
    if users.is_empty() {
        return "No users found.".to_string();
    }

    let mut lines = Vec::with_capacity(users.len() + 1);
    lines.push(format!("{:<20}  {:<28}  {:<6}  ID", "NAME", "EMAIL", "ADMIN"));
    for user in users {
        lines.push(format!(
            "{:<20}  {:<28}  {:<6}  {}",
            user.name,
            user.email,
            if user.is_admin { "Yes" } else { "No" },
            user.id
        ));
    }

    lines.join("\n")
}

fn parse_price(raw: &str) -> Result<Decimal, CommandResult> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|_| CommandResult::failure(format!("invalid price `{raw}`"), 2))
}

fn load_cover(path: Option<&Path>) -> Result<Option<CoverUpload>, CommandResult> {
    let Some(path) = path else {
        return Ok(None);
    };

    let bytes = fs::read(path).map_err(|error| {
        CommandResult::failure(format!("could not read cover image `{}`: {error}", path.display()), 2)
    })?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "cover".to_string());

    Ok(Some(CoverUpload { file_name, bytes }))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use libris_core::domain::borrow::{BorrowId, BorrowRecord, BorrowedBookRef};
    use libris_core::domain::user::{User, UserId};

    use super::{parse_price, render_borrows_table, render_dashboard, render_users_table};

    #[test]
    fn the_dashboard_summarizes_all_three_collections() {
        let rendered = render_dashboard(12, 4, 7);

        assert!(rendered.starts_with("Admin Dashboard Overview"));
        assert!(rendered.contains("Total books:    12"));
        assert!(rendered.contains("Borrow records: 4"));
        assert!(rendered.contains("Total users:    7"));
    }

    #[test]
    fn borrow_tables_fall_back_to_not_available_for_dangling_refs() {
        let records = vec![BorrowRecord {
            id: BorrowId("r-1".to_string()),
            user: None,
            book: Some(BorrowedBookRef { title: "Hymns".to_string() }),
            borrowed_at: Utc.with_ymd_and_hms(2026, 7, 1, 9, 30, 0).single().expect("valid date"),
            due_date: None,
            returned: false,
        }];

        let table = render_borrows_table(&records);
        let row = table.lines().nth(1).expect("one data row");

        assert!(row.starts_with("N/A"));
        assert!(row.contains("Hymns"));
        assert!(row.contains("2026-07-01 09:30"));
        assert!(row.contains("No"));
    }

    #[test]
    fn empty_collections_render_their_empty_lines() {
        assert_eq!(render_borrows_table(&[]), "No borrow records found.");
        assert_eq!(render_users_table(&[]), "No users found.");
    }

    #[test]
    fn user_rows_show_the_admin_flag() {
        let users = vec![
            User {
                id: UserId("u-1".to_string()),
                name: "Jane".to_string(),
                email: "jane@example.com".to_string(),
                is_admin: true,
            },
            User {
                id: UserId("u-2".to_string()),
                name: "John".to_string(),
                email: "john@example.com".to_string(),
                is_admin: false,
            },
        ];

        let table = render_users_table(&users);
        assert!(table.lines().nth(1).expect("first row").contains("Yes"));
        assert!(table.lines().nth(2).expect("second row").contains("No"));
    }

    #[test]
    fn prices_parse_as_decimals_or_fail_with_exit_code_two() {
        assert_eq!(parse_price("24.99").expect("valid price").to_string(), "24.99");

        let failure = parse_price("a lot").expect_err("invalid price");
        assert_eq!(failure.exit_code, 2);
        assert!(failure.output.contains("invalid price"));
    }
}
