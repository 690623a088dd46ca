//! Asset lookup for pre-rendered fingerspelling imagery.
//!
//! Letters resolve to animated GIFs named `A.gif`..`Z.gif`; digits to
//! static PNGs named `0.png`..`9.png`. A missing file is an expected
//! outcome for the caller to report, not an error.

use std::ops::RangeInclusive;
use std::path::PathBuf;

/// Naming rule that maps a symbol to an on-disk image asset.
#[derive(Debug, Clone)]
pub struct AssetLibrary {
    dir: PathBuf,                    // directory holding the assets
    extension: &'static str,         // file extension without the dot
    symbols: RangeInclusive<char>,   // symbols this library can resolve
    label: &'static str,             // inventory heading
}

impl AssetLibrary {
    /// Letter assets: one animated GIF per uppercase letter.
    pub fn letters(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            extension: "gif",
            symbols: 'A'..='Z',
            label: "Letters",
        }
    }

    /// Digit assets: one static PNG per digit.
    pub fn digits(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            extension: "png",
            symbols: '0'..='9',
            label: "Digits",
        }
    }

    /// The path the asset for `symbol` would live at.
    pub fn path_for(&self, symbol: char) -> PathBuf {
        self.dir.join(format!("{}.{}", symbol, self.extension))
    }

    /// Look up the asset for `symbol`, if one exists on disk.
    pub fn lookup(&self, symbol: char) -> Option<PathBuf> {
        let path = self.path_for(symbol);
        path.is_file().then_some(path)
    }

    /// Symbols that currently have an asset on disk.
    pub fn available(&self) -> Vec<char> {
        self.symbols.clone().filter(|&c| self.lookup(c).is_some()).collect()
    }

    /// Symbols with no asset on disk.
    pub fn missing(&self) -> Vec<char> {
        self.symbols.clone().filter(|&c| self.lookup(c).is_none()).collect()
    }
}

/// Print the asset inventory for both libraries.
pub fn print_inventory(letters: &AssetLibrary, digits: &AssetLibrary) {
    println!();
    println!("════════════════════════════════════════════════");
    println!("  ASL asset inventory");
    println!("════════════════════════════════════════════════");

    for library in [letters, digits] {
        println!();
        println!(
            "── {} ({}, *.{}) ──",
            library.label,
            library.dir.display(),
            library.extension
        );

        if !library.dir.is_dir() {
            println!("  directory not found");
            continue;
        }

        let available = library.available();
        let missing = library.missing();
        println!("  present ({}): {}", available.len(), join_symbols(&available));
        if !missing.is_empty() {
            println!("  missing ({}): {}", missing.len(), join_symbols(&missing));
        }
    }
    println!();
}

fn join_symbols(symbols: &[char]) -> String {
    if symbols.is_empty() {
        return "-".to_string();
    }
    symbols.iter().map(char::to_string).collect::<Vec<_>>().join(" ")
}
