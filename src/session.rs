//! Startup, event loop and teardown for one blackout.
//!
//! A [`Session`] owns every resource it creates on the platform and releases
//! them in reverse order. Teardown is idempotent and also runs on drop, so a
//! failed or panicking startup never leaves the pointer hidden or a surface
//! on screen.

use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::cursor;
use crate::dispatch::Dispatcher;
use crate::error::StartupError;
use crate::overlay::{self, CoveragePolicy, Overlay};
use crate::platform::{BrushHandle, HookHandle, Platform};

pub struct Session<'p, P: Platform + ?Sized> {
    platform: &'p mut P,
    dispatcher: Dispatcher,
    coverage: CoveragePolicy,

    cursor_hidden: bool,
    brush: Option<BrushHandle>,
    class_registered: bool,
    surfaces: Vec<Overlay>,
    hook: Option<HookHandle>,
}

impl<'p, P: Platform + ?Sized> Session<'p, P> {
    pub fn new(platform: &'p mut P, dispatcher: Dispatcher, coverage: CoveragePolicy) -> Self {
        Self {
            platform,
            dispatcher,
            coverage,
            cursor_hidden: false,
            brush: None,
            class_registered: false,
            surfaces: Vec::new(),
            hook: None,
        }
    }

    pub fn from_config(platform: &'p mut P, config: &AppConfig) -> Self {
        Self::new(platform, Dispatcher::new(config.exit_key()), config.coverage)
    }

    pub fn platform(&self) -> &P {
        &*self.platform
    }

    /// Every overlay this session created. Destroyed ones stay listed with
    /// their final state until the next start.
    pub fn surfaces(&self) -> &[Overlay] {
        &self.surfaces
    }

    pub fn hook_installed(&self) -> bool {
        self.hook.is_some()
    }

    /// Hides the pointer and covers every display. On error the session has
    /// already been torn down.
    pub fn start(&mut self) -> Result<(), StartupError> {
        let result = self.try_start();
        if let Err(e) = &result {
            error!(error = %e, "startup failed");
            self.teardown();
        }
        result
    }

    fn try_start(&mut self) -> Result<(), StartupError> {
        if !self.cursor_hidden {
            // set first so teardown unwinds a partial hide
            self.cursor_hidden = true;
            cursor::ensure_hidden(&mut *self.platform)?;
        }

        let brush = self.platform.create_black_brush()?;
        self.brush = Some(brush);

        self.platform.register_surface_class(brush, self.dispatcher)?;
        self.class_registered = true;

        let displays = self.platform.enumerate_displays()?;
        info!(count = displays.len(), "displays found");

        self.surfaces = overlay::create_overlays(&mut *self.platform, &displays, self.coverage)?;

        if let Some(first) = self.surfaces.first() {
            self.platform.focus_surface(first.handle);
        }

        match self.platform.install_key_hook(self.dispatcher) {
            Ok(hook) => {
                info!(exit_key = %self.dispatcher.exit_key, "keyboard hook installed");
                self.hook = Some(hook);
            }
            Err(e) => {
                warn!(
                    error = %e,
                    "running without a global keyboard hook; the exit key only works while an overlay has focus"
                );
            }
        }

        Ok(())
    }

    /// Blocks until the exit key is observed. Returns the loop's exit code.
    pub fn run(&mut self) -> i32 {
        let live = self.surfaces.iter().filter(|o| o.is_live()).count();
        info!(surfaces = live, "screens blanked");
        let code = self.platform.run_event_loop();
        info!(code, "exit requested");
        code
    }

    /// Releases everything in reverse creation order. Safe to call repeatedly
    /// and on a partially started session.
    pub fn teardown(&mut self) {
        if let Some(hook) = self.hook.take() {
            self.platform.remove_key_hook(hook);
        }

        for overlay in &mut self.surfaces {
            overlay.destroy(&mut *self.platform);
        }

        if self.class_registered {
            self.platform.unregister_surface_class();
            self.class_registered = false;
        }

        if let Some(brush) = self.brush.take() {
            self.platform.release_brush(brush);
        }

        if self.cursor_hidden {
            if let Err(e) = cursor::ensure_shown(&mut *self.platform) {
                error!(error = %e, "pointer could not be restored");
            }
            self.cursor_hidden = false;
        }
    }
}

impl<P: Platform + ?Sized> Drop for Session<'_, P> {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Full program flow: start, loop until the exit key, tear down.
pub fn run<P: Platform + ?Sized>(platform: &mut P, config: &AppConfig) -> Result<i32, StartupError> {
    let mut session = Session::from_config(platform, config);
    session.start()?;
    let code = session.run();
    session.teardown();
    Ok(code)
}
