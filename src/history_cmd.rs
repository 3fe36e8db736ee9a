use std::path::Path;

use calclog::history;

pub fn cmd_history_show(path: &Path) -> i32 {
    let entries = history::load(path);
    if let Err(e) = history::display(&entries, &mut std::io::stdout().lock()) {
        eprintln!("[calclog] error writing history: {e}");
        return 1;
    }
    0
}

pub fn cmd_history_path(path: &Path) -> i32 {
    println!("{}", path.display());
    0
}
