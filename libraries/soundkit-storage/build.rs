// `sqlx::migrate!` embeds the SQL files at compile time; new or edited
// migrations must invalidate the build.
fn main() {
    println!("cargo:rerun-if-changed=migrations");
}
