//! A simple actor to read from the 6-axis IMU.
//!
//! This actor can be used to read from the MPU6050 sensor
//! at a set rate or on demand.

use actor_private::*;
use ector::ActorContext;
use embassy_executor::Spawner;
use log::info;
use mpu6050::Config as Mpu6050Config;
use {
    core::future::pending,
    embassy_executor::SpawnError,
    embassy_futures::select::{Either, select},
    embassy_time::{Duration, Timer},
};

use crate::{ActorInbox, bsp::I2cBus};

/// The actor's message type, communicating the finite states of the actor.
/// This is made available to other actors to interact with this one.
pub enum Message {
    /// Put the sensor to sleep or wake it back up
    Sleep(bool),
    /// Read the data from the sensor at a set period
    Start(Duration),
    /// Stop reading the data from the sensor
    Stop,
}

/// The actor's configuration, to be shared with other actors to initialize this actor.
pub struct Config {
    pub i2c_bus: &'static I2cBus<'static>,
    /// Sample rate divider and full-scale ranges written at initialization
    pub mpu: Mpu6050Config,
}

/// Create a new actor with a spawner and a configuration.
pub fn spawn_actor(spawner: Spawner, config: Config) -> Result<ActorInbox<Message>, SpawnError> {
    static CONTEXT: ActorContext<Actor, ector::mutex::NoopRawMutex, 10> = ActorContext::new();
    let inbox = CONTEXT.address();
    spawner.spawn(actor_task(&CONTEXT, Actor::new(spawner, config, inbox)))?;
    Ok(inbox)
}

mod actor_private {

    use ector::{DynamicAddress, Inbox};
    use embassy_embedded_hal::shared_bus::blocking::i2c::I2cDevice;
    use embassy_time::Instant;
    use mpu6050::Mpu6050;

    use crate::AppError;
    use crate::bsp::I2cBusDevice;

    use super::*;
    /// A scheduler to run a sequence of actions.
    struct Scheduler {
        /// The timer to schedule the next action
        timer: Timer,
        /// The period between actions
        period: Duration,
    }

    /// The actor's private data, not to be shared with other actors.
    /// This is where the actor's state is stored.
    pub(super) struct Actor {
        /// A timer to schedule the next message
        scheduler: Option<Scheduler>,
        /// The onboard inertial sensor
        device: Mpu6050<I2cBusDevice<'static>>,
        /// Error state
        error: bool,
    }

    impl ector::Actor for Actor {
        type Message = Message;

        /// Actor pattern for either handling new incoming messages or running a scheduled action.
        async fn on_mount<M>(&mut self, _: DynamicAddress<Message>, mut inbox: M) -> !
        where
            M: Inbox<Self::Message>,
        {
            info!("IMU Task started!");
            loop {
                let deadline = async {
                    match self.scheduler.as_mut() {
                        Some(Scheduler { timer, .. }) => timer.await,
                        None => pending().await,
                    }
                };
                match select(inbox.next(), deadline).await {
                    Either::First(action) => self.act(action).await,
                    Either::Second(_) => self.next().await,
                }
            }
        }
    }

    impl Actor {
        /// Create a new actor with a spawner and a configuration.
        pub(super) fn new(_: Spawner, config: Config, _: ActorInbox<Message>) -> Self {
            let i2c = I2cDevice::new(config.i2c_bus);
            let mut device = Mpu6050::with_config(i2c, config.mpu);
            let error = match device.init() {
                Ok(()) => {
                    info!("MPU6050 found, sample rate is {} Hz", device.sample_rate_hz());
                    false
                }
                Err(error) => {
                    log::error!("{}", AppError::ImuInit(error));
                    true
                }
            };
            Self {
                scheduler: None,
                device,
                error,
            }
        }
        /// The message handler
        async fn act(&mut self, msg: Message) {
            match msg {
                Message::Sleep(sleep) => {
                    if let Err(error) = self.device.set_sleep_enabled(sleep) {
                        log::error!("Failed to set sleep mode: {:?}", error);
                        self.error = true;
                        return;
                    }
                    info!("Sleep mode set to {:?}", sleep);
                }
                Message::Start(period) => {
                    // One output sample becomes available every
                    // 1 / sample_rate seconds; polling faster than that
                    // only rereads the same registers.
                    let sample_interval =
                        Duration::from_micros(1_000_000 / self.device.sample_rate_hz() as u64);
                    if period <= sample_interval {
                        log::error!(
                            "{}",
                            AppError::InvalidReadPeriod(
                                period.as_millis(),
                                sample_interval.as_millis()
                            )
                        );
                        return;
                    }
                    info!("Starting measurement every {:?} ms", period.as_millis());
                    self.scheduler = Some(Scheduler {
                        timer: Timer::after(period),
                        period,
                    });
                    self.next().await;
                }
                Message::Stop => {
                    info!("Stopping measurement");
                    self.scheduler = None
                }
            }
        }
        /// Run the next scheduled action.
        async fn next(&mut self) {
            let Some(scheduler) = self.scheduler.take() else {
                return; // no scheduled action
            };
            let now = Instant::now();
            let period = scheduler.period;
            self.read_measurement();
            self.scheduler = Some(Scheduler {
                timer: Timer::after(period - now.elapsed()),
                period,
            });
        }

        /// Read the acceleration and angular rate from the sensor
        fn read_measurement(&mut self) {
            match (
                self.device.read_acceleration(),
                self.device.read_angular_rate(),
            ) {
                (Ok(accel), Ok(rate)) => {
                    info!("Accel: {:?} g", accel);
                    info!("Gyro: {:?} deg/s", rate);
                }
                (Err(error), _) | (_, Err(error)) => {
                    log::error!("Failed to read measurement: {:?}", error);
                    self.error = true;
                }
            }
        }
    }

    #[embassy_executor::task]
    /// The actor's task, to be spawned by the actor's context.
    pub(super) async fn actor_task(
        context: &'static ActorContext<Actor, ector::mutex::NoopRawMutex, 10>,
        actor: Actor,
    ) {
        context.mount(actor).await;
    }
}
