use crate::output::is_quiet;
use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

pub fn header(icon: &str, text: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}", icon, text.style(theme().header.clone()));
}

pub fn success(label: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}", Icons::CHECK, label.style(theme().success.clone()));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(theme().error.clone()));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(theme().warn.clone()));
}

pub fn empty(label: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}", Icons::EMPTY, label.style(theme().dim.clone()));
}

/// Print a pre-rendered block (tables, summaries) unless quiet.
pub fn block(text: &str) {
    if is_quiet() {
        return;
    }
    println!("{}", text);
}

pub fn dim(text: &str) -> String {
    text.style(theme().dim.clone()).to_string()
}

pub fn status(icon: &str, label: &str, value: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}: {}", icon, label.style(theme().label.clone()), value);
}

/// Header naming a species and the catalogs it was read from.
pub fn catalog_header(icon: &str, species: &str, origin: &str, dbsource: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}", icon, theme().catalog_label(species, origin, dbsource));
}
