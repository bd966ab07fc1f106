use anyhow::Result;
use stratawm::WindowManager;

fn main() -> Result<()> {
    env_logger::init();

    let mut wm = WindowManager::new()?;
    wm.run()?;

    Ok(())
}
