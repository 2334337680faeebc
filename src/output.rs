//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use tabled::{Table, Tabled};

use filedeck_entity::{BreadcrumbEntry, File, Folder, Share};

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// One folder or file in a listing.
#[derive(Debug, Serialize, Tabled)]
pub struct ItemRow {
    /// `folder:<id>` or `file:<id>`
    #[tabled(rename = "item")]
    pub key: String,
    /// Display name
    pub name: String,
    /// `folder` or the file's extension
    pub kind: String,
    /// Size, blank for folders
    pub size: String,
    /// Last update
    pub updated: String,
}

impl ItemRow {
    /// Rows for folders first, then files, as the drive lists them.
    pub fn listing(folders: &[Folder], files: &[File]) -> Vec<Self> {
        let folder_rows = folders.iter().map(|f| Self {
            key: format!("folder:{}", f.id),
            name: format!("{}/", f.name),
            kind: "folder".to_string(),
            size: f.size.map(format_bytes).unwrap_or_default(),
            updated: format_time(f.updated_at.or(f.created_at)),
        });
        let file_rows = files.iter().map(|f| Self {
            key: format!("file:{}", f.id),
            name: f.name.clone(),
            kind: f.extension().unwrap_or_else(|| "file".to_string()),
            size: format_bytes(f.size),
            updated: format_time(f.updated_at.or(f.created_at)),
        });
        folder_rows.chain(file_rows).collect()
    }
}

/// One share record.
#[derive(Debug, Serialize, Tabled)]
pub struct ShareRow {
    /// Share ID
    pub id: String,
    /// Shared item name
    pub item: String,
    /// Item type
    #[tabled(rename = "type")]
    pub item_type: String,
    /// Other party's email
    pub with: String,
    /// Permission
    pub permission: String,
}

impl ShareRow {
    /// Build a row, showing the owner for incoming shares and the recipient for sent ones.
    pub fn new(share: &Share, incoming: bool) -> Self {
        let party = if incoming {
            share.owner.as_ref()
        } else {
            share.shared_with.as_ref()
        };
        Self {
            id: share.id.to_string(),
            item: share.item_name().to_string(),
            item_type: share.item_type.to_string(),
            with: party.map(|p| p.email.clone()).unwrap_or_default(),
            permission: share.permission.to_string(),
        }
    }
}

/// Print a list of items in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No results found.");
            } else {
                let table = Table::new(items).to_string();
                println!("{}", table);
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string());
            println!("{}", json);
        }
    }
}

/// Print a single item in the selected format
pub fn print_item<T: Serialize + std::fmt::Debug>(item: &T, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            println!("{:#?}", item);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(item).unwrap_or_else(|_| "{}".to_string());
            println!("{}", json);
        }
    }
}

/// Print the breadcrumb trail above a listing.
pub fn print_breadcrumbs(entries: &[BreadcrumbEntry]) {
    println!("{}", filedeck_entity::breadcrumb::display_path(entries));
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {}", msg);
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {}", msg);
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {}", msg);
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{}:", key), value);
}

/// Human-readable byte count.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

fn format_time(time: Option<chrono::DateTime<chrono::Utc>>) -> String {
    time.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn test_listing_puts_folders_first() {
        let folders = vec![Folder::new("F1", "Docs", None)];
        let files = vec![File::new("f1", "a.txt", None, 10)];
        let rows = ItemRow::listing(&folders, &files);
        assert_eq!(rows[0].key, "folder:F1");
        assert_eq!(rows[0].name, "Docs/");
        assert_eq!(rows[1].key, "file:f1");
        assert_eq!(rows[1].kind, "txt");
        assert_eq!(rows[1].size, "10 B");
    }
}
