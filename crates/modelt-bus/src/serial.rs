//! 串口句柄实现

use crate::{BusError, DEFAULT_BAUD_RATE, PortHandler};
use dynamixel2::Bus;
use tracing::info;

/// 带默认收发缓冲区的 Protocol 2.0 总线
pub type SerialBus = Bus<Vec<u8>, Vec<u8>>;

/// 基于 `dynamixel2::Bus` 的端口句柄
///
/// 打开端口即创建总线；波特率变更时按新波特率重新打开。
pub struct SerialPortHandler {
    port_name: String,
    baud_rate: u32,
    bus: Option<SerialBus>,
}

impl SerialPortHandler {
    pub fn new(port_name: impl Into<String>) -> Self {
        Self {
            port_name: port_name.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            bus: None,
        }
    }

    /// 已打开的总线
    pub fn bus_mut(&mut self) -> Option<&mut SerialBus> {
        self.bus.as_mut()
    }
}

impl PortHandler for SerialPortHandler {
    fn port_name(&self) -> &str {
        &self.port_name
    }

    fn open_port(&mut self) -> Result<(), BusError> {
        self.close_port();

        let bus = Bus::open(&self.port_name, self.baud_rate).map_err(|source| BusError::Open {
            port: self.port_name.clone(),
            source,
        })?;

        info!("Port opened successfully: {}", self.port_name);
        self.bus = Some(bus);
        Ok(())
    }

    fn close_port(&mut self) {
        if self.bus.take().is_some() {
            info!("Port closed: {}", self.port_name);
        }
    }

    fn is_open(&self) -> bool {
        self.bus.is_some()
    }

    fn set_baud_rate(&mut self, baud_rate: u32) -> Result<(), BusError> {
        if self.bus.take().is_some() {
            let bus = Bus::open(&self.port_name, baud_rate)
                .map_err(|source| BusError::BaudRate { baud_rate, source })?;
            self.bus = Some(bus);
        }
        self.baud_rate = baud_rate;
        Ok(())
    }

    fn baud_rate(&self) -> u32 {
        self.baud_rate
    }
}

impl Drop for SerialPortHandler {
    fn drop(&mut self) {
        self.close_port();
    }
}
