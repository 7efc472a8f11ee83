//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter            | Implements        | Connects to                 |
//! |--------------------|-------------------|-----------------------------|
//! | `hardware`         | PeripheralPort    | drivers (LEDC, GPIO, I2C)   |
//! | `log_sink`         | EventSink         | Serial log output           |
//! | `stream_transport` | TransportPort     | any `ByteChannel`           |
//! | `tick_timer`       | TickSource        | ESP32 high-resolution timer |
//! | `uart_channel`     | ByteChannel       | ESP-IDF UART driver         |

pub mod hardware;
pub mod log_sink;
pub mod stream_transport;
pub mod tick_timer;
#[cfg(feature = "espidf")]
pub mod uart_channel;
