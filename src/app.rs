// Version is of the format 0.YY.MM[.i], or 0.year.month.optional_minor_increment,
// so it is immediately clear when the conversion tables were last touched.
// The Cargo.toml version is not used for this.
pub const APP_VERSION: &str = "0.26.10";
