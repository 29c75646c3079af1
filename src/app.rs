//! Root of the windowing subsystem: owns the backend, the overlay registry
//! and every window spawned through it.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, info};

use crate::error::{FrameHostError, Result};
use crate::events::WindowEvents;
use crate::frame::{EdgeOverlayRegistry, SharedRegistry};
use crate::options::{AppOptions, WindowOptions};
use crate::platform::{WindowHandle, WindowHost};
use crate::window::WindowController;

type WindowTable<B> = Rc<RefCell<HashMap<WindowHandle, Rc<WindowController<B>>>>>;

/// Native messages and overlay input reach each window's controller directly
/// through the backend's procedures; the app only keeps the table of live
/// windows, which every controller leaves when its window is destroyed.
pub struct App<B: WindowHost> {
    backend: Rc<B>,
    options: AppOptions,
    registry: SharedRegistry,
    windows: WindowTable<B>,
}

impl<B: WindowHost> App<B> {
    pub fn new(backend: Rc<B>, options: AppOptions) -> Self {
        info!("[App:{}] starting", options.app_id);
        Self {
            backend,
            options,
            registry: EdgeOverlayRegistry::shared(),
            windows: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    pub fn options(&self) -> &AppOptions {
        &self.options
    }

    pub fn backend(&self) -> &Rc<B> {
        &self.backend
    }

    pub fn registry(&self) -> SharedRegistry {
        Rc::clone(&self.registry)
    }

    pub fn spawn_window(
        &self,
        options: WindowOptions,
        events: WindowEvents,
    ) -> Result<Rc<WindowController<B>>> {
        let options = options.resolved_for(&self.options);
        let window = WindowController::create(
            Rc::clone(&self.backend),
            Rc::clone(&self.registry),
            &options,
            events,
        )?;

        let table = Rc::downgrade(&self.windows);
        let app_id = self.options.app_id.clone();
        window.on_destroyed(move |handle| {
            let Some(table) = table.upgrade() else { return };
            let removed = table.borrow_mut().remove(&handle);
            if removed.is_some() {
                debug!("[App:{}] {:?} left the window table", app_id, handle);
            }
        });

        let open = {
            let mut windows = self.windows.borrow_mut();
            windows.insert(window.handle(), Rc::clone(&window));
            windows.len()
        };
        debug!("[App:{}] {} window(s) open", self.options.app_id, open);
        Ok(window)
    }

    /// Destroys `handle` without consulting its `closing` callback.
    pub fn despawn_window(&self, handle: WindowHandle) -> Result<()> {
        let window = self
            .windows
            .borrow_mut()
            .remove(&handle)
            .ok_or(FrameHostError::UnknownWindow(handle))?;
        window.destroy();
        Ok(())
    }

    pub fn window(&self, handle: WindowHandle) -> Option<Rc<WindowController<B>>> {
        self.windows
            .borrow()
            .get(&handle)
            .filter(|w| !w.is_destroyed())
            .cloned()
    }

    pub fn window_count(&self) -> usize {
        self.windows.borrow().values().filter(|w| !w.is_destroyed()).count()
    }

    /// Pumps the native message loop until [`App::exit`] is called.
    pub fn run(&self) -> Result<()> {
        info!("[App:{}] entering message loop", self.options.app_id);
        self.backend.run_message_loop()
    }

    pub fn exit(&self) {
        info!("[App:{}] exit requested", self.options.app_id);
        self.backend.quit();
    }
}

impl<B: WindowHost> Drop for App<B> {
    fn drop(&mut self) {
        let windows: Vec<_> = self.windows.borrow_mut().drain().map(|(_, w)| w).collect();
        for window in windows {
            window.destroy();
        }
        info!("[App:{}] shut down", self.options.app_id);
    }
}
