//! Controller assembly.
//!
//! [`LightController`] wires the registry, the default color store and both
//! transports to one [`Scheduler`]. The external driver loop only has to call
//! [`LightController::tick`] with the current time.
//!
//! # Usage
//!
//! ```ignore
//! let mut controller = LightController::<_, _, _, _, 2, 60>::new(
//!     MemoryStorage::<8>::new(),
//!     http_server,
//!     &PACKETS,
//!     ControllerConfig::default(),
//! );
//! controller.register_device(strip, 60, Some("desk"))?;
//! controller.start(Instant::from_millis(get_current_time_ms()))?;
//!
//! loop {
//!     controller.tick(Instant::from_millis(get_current_time_ms()));
//! }
//! ```

use embassy_time::Instant;
use embedded_storage::Storage;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::OutputDriver;
use crate::blend::blend_step;
use crate::config::ControllerConfig;
use crate::datagram::DatagramTransport;
use crate::device::DeviceId;
use crate::dispatch::{TextDispatcher, datagram};
use crate::http::RequestServer;
use crate::persistence::DefaultColorStore;
use crate::registry::{DeviceRegistry, RegistryError};
use crate::scheduler::{Scheduler, SchedulerError, TaskControl, TaskFn, TaskHandle};

/// Number of tasks the controller registers
pub const TASKS: usize = 3;

/// State shared by the controller tasks
struct Context<D, S, R, U, const DEVICES: usize, const MAX_LEDS: usize> {
    registry: DeviceRegistry<D, DEVICES, MAX_LEDS>,
    store: DefaultColorStore<S>,
    requests: R,
    datagrams: U,
    blend: Option<TaskHandle>,
}

impl<D, S, R, U, const DEVICES: usize, const MAX_LEDS: usize> Context<D, S, R, U, DEVICES, MAX_LEDS>
where
    D: OutputDriver,
{
    /// Turn a pending blend request into arming the blend task
    fn arm_blend(&mut self, control: &mut TaskControl<'_>) {
        if self.registry.take_blend_request()
            && let Some(blend) = self.blend
        {
            control.enable(blend);
        }
    }
}

type ControllerScheduler<D, S, R, U, const DEVICES: usize, const MAX_LEDS: usize> = Scheduler<
    Context<D, S, R, U, DEVICES, MAX_LEDS>,
    TaskFn<Context<D, S, R, U, DEVICES, MAX_LEDS>>,
    TASKS,
>;

fn poll_requests<D, S, R, U, const DEVICES: usize, const MAX_LEDS: usize>(
    ctx: &mut Context<D, S, R, U, DEVICES, MAX_LEDS>,
    control: &mut TaskControl<'_>,
) where
    D: OutputDriver,
    S: Storage,
    R: RequestServer,
{
    let mut dispatcher = TextDispatcher::new(&mut ctx.registry, &mut ctx.store);
    ctx.requests.poll(&mut dispatcher);
    ctx.arm_blend(control);
}

fn poll_datagrams<D, S, R, U, const DEVICES: usize, const MAX_LEDS: usize>(
    ctx: &mut Context<D, S, R, U, DEVICES, MAX_LEDS>,
    control: &mut TaskControl<'_>,
) where
    D: OutputDriver,
    S: Storage,
    U: DatagramTransport,
{
    datagram::dispatch(&mut ctx.datagrams, &mut ctx.registry, &mut ctx.store);
    ctx.arm_blend(control);
}

fn blend<D, S, R, U, const DEVICES: usize, const MAX_LEDS: usize>(
    ctx: &mut Context<D, S, R, U, DEVICES, MAX_LEDS>,
    control: &mut TaskControl<'_>,
) where
    D: OutputDriver,
{
    if !blend_step(&mut ctx.registry) {
        control.disable(control.current());
    }
}

/// LED strip controller driven by a cooperative scheduler.
///
/// `R` serves the text protocol, `U` delivers datagrams. Tasks fire in a fixed
/// order: text poll, datagram poll, blend. The blend task arms itself when a
/// command changes a target and disarms once every strip has settled.
pub struct LightController<D, S, R, U, const DEVICES: usize, const MAX_LEDS: usize> {
    config: ControllerConfig,
    scheduler: ControllerScheduler<D, S, R, U, DEVICES, MAX_LEDS>,
    context: Context<D, S, R, U, DEVICES, MAX_LEDS>,
}

impl<D, S, R, U, const DEVICES: usize, const MAX_LEDS: usize>
    LightController<D, S, R, U, DEVICES, MAX_LEDS>
where
    D: OutputDriver,
    S: Storage,
    R: RequestServer,
    U: DatagramTransport,
{
    pub fn new(storage: S, requests: R, datagrams: U, config: ControllerConfig) -> Self {
        Self {
            config,
            scheduler: Scheduler::new(),
            context: Context {
                registry: DeviceRegistry::new(),
                store: DefaultColorStore::new(storage),
                requests,
                datagrams,
                blend: None,
            },
        }
    }

    /// Add a strip, see [`DeviceRegistry::register`]
    pub fn register_device(
        &mut self,
        driver: D,
        leds: usize,
        name: Option<&str>,
    ) -> Result<DeviceId, RegistryError> {
        let Context {
            registry, store, ..
        } = &mut self.context;
        registry.register(driver, leds, name, store)
    }

    /// Register the tasks. Call once, after every device is registered.
    pub fn start(&mut self, now: Instant) -> Result<(), SchedulerError> {
        if self.context.blend.is_some() {
            return Ok(());
        }
        let requests: TaskFn<Context<D, S, R, U, DEVICES, MAX_LEDS>> = poll_requests;
        let datagrams: TaskFn<Context<D, S, R, U, DEVICES, MAX_LEDS>> = poll_datagrams;
        let blend_task: TaskFn<Context<D, S, R, U, DEVICES, MAX_LEDS>> = blend;

        self.scheduler
            .register(requests, self.config.request_poll_interval, true, now)?;
        self.scheduler
            .register(datagrams, self.config.datagram_poll_interval, true, now)?;
        self.context.registry.take_blend_request();
        let blending = self.context.registry.is_blending();
        let handle = self
            .scheduler
            .register(blend_task, self.config.blend_interval, blending, now)?;
        self.context.blend = Some(handle);

        #[cfg(feature = "esp32-log")]
        {
            println!("controller: {} devices registered", self.context.registry.len());
            for device in self.context.registry.iter() {
                println!("controller: {}", device.info());
            }
        }
        Ok(())
    }

    /// One scheduler step. Returns `true` if a task was fired.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.context.registry.take_blend_request()
            && let Some(blend) = self.context.blend
        {
            self.scheduler.enable(blend, now);
        }
        self.scheduler.tick(now, &mut self.context)
    }

    pub const fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn registry(&self) -> &DeviceRegistry<D, DEVICES, MAX_LEDS> {
        &self.context.registry
    }

    /// Direct registry access. Changes made here arm the blend task on the next [`tick`](Self::tick).
    pub fn registry_mut(&mut self) -> &mut DeviceRegistry<D, DEVICES, MAX_LEDS> {
        &mut self.context.registry
    }

    pub fn store(&self) -> &DefaultColorStore<S> {
        &self.context.store
    }

    pub fn store_mut(&mut self) -> &mut DefaultColorStore<S> {
        &mut self.context.store
    }

    pub fn requests_mut(&mut self) -> &mut R {
        &mut self.context.requests
    }

    pub fn datagrams_mut(&mut self) -> &mut U {
        &mut self.context.datagrams
    }

    /// Handle of the blend task, once started
    pub const fn blend_task(&self) -> Option<TaskHandle> {
        self.context.blend
    }

    /// Whether the blend task is armed
    pub fn is_blend_armed(&self) -> bool {
        self.context
            .blend
            .is_some_and(|blend| self.scheduler.is_enabled(blend))
    }

    /// Number of registered tasks
    pub fn task_count(&self) -> usize {
        self.scheduler.len()
    }
}
