//! Schema command - print the SDL

/// Print the GraphQL schema to stdout
pub fn run_schema() {
    println!("{}", productql_server::schema_sdl());
}
