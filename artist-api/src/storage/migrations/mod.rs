use refinery::embed_migrations;

embed_migrations!("src/storage/migrations");

pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), refinery::Error> {
    let report = migrations::runner().run(conn)?;
    for migration in report.applied_migrations() {
        tracing::info!("Applied migration {}", migration);
    }
    Ok(())
}
