pub mod commands;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

use tauri::Manager;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    if let Err(error) = try_run() {
        eprintln!("failed to launch application: {error}");
    }
}

fn try_run() -> Result<(), Box<dyn std::error::Error>> {
    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            let handle = app.handle();

            crate::utils::logger::init_logging(&handle)
                .map_err(|err| Box::new(err) as Box<dyn std::error::Error>)?;

            let state = crate::commands::AppState::new()
                .map_err(|err| Box::new(err) as Box<dyn std::error::Error>)?;
            app.manage(state);

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            crate::commands::session::session_sign_in,
            crate::commands::session::session_sign_out,
            crate::commands::session::session_current,
            crate::commands::sections::sections_load,
            crate::commands::sections::sections_filter,
            crate::commands::roster::roster_load,
            crate::commands::grades::grades_record_edit,
            crate::commands::grades::grades_pending,
            crate::commands::grades::grades_save,
        ])
        .run(tauri::generate_context!())?;

    Ok(())
}
