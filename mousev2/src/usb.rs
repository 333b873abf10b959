//! USB HID transport.

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_usb::class::hid::{Config as HidConfig, HidBootProtocol, HidSubclass, HidWriter, State};
use embassy_usb::driver::{Driver, EndpointError};
use embassy_usb::{Builder, Handler};
use mousev2_types::report::MOUSE_REPORT_SIZE;
use static_cell::StaticCell;

use crate::config::MouseUsbConfig;
use crate::hid::{Transport, TransportError};
use crate::{MOUSE_REPORT_ID, MouseReport, REPORT_DESCRIPTOR};

/// Whether the host configured the device
pub static USB_CONFIGURED: AtomicBool = AtomicBool::new(false);

/// Report id and report
const USB_REPORT_SIZE: usize = MOUSE_REPORT_SIZE + 1;

impl From<EndpointError> for TransportError {
    fn from(e: EndpointError) -> Self {
        match e {
            EndpointError::BufferOverflow => TransportError::BufferOverflow,
            EndpointError::Disabled => TransportError::Disabled,
        }
    }
}

/// [`Transport`] over a USB HID interrupt endpoint
pub struct UsbHidTransport<'d, D: Driver<'d>> {
    writer: HidWriter<'d, D, 8>,
}

impl<'d, D: Driver<'d>> UsbHidTransport<'d, D> {
    pub fn new(writer: HidWriter<'d, D, 8>) -> Self {
        Self { writer }
    }
}

impl<'d, D: Driver<'d>> Transport for UsbHidTransport<'d, D> {
    fn available(&self) -> bool {
        USB_CONFIGURED.load(Ordering::Acquire)
    }

    async fn send(&mut self, report: &MouseReport) -> Result<(), TransportError> {
        let mut buf = [0u8; USB_REPORT_SIZE];
        buf[0] = MOUSE_REPORT_ID;
        let n = report.serialize(&mut buf[1..]);
        self.writer.write(&buf[..n + 1]).await?;
        Ok(())
    }

    async fn update_battery_level(&mut self, _level: u8) -> Result<(), TransportError> {
        // USB powered, there's no battery service to update
        Ok(())
    }
}

pub fn new_usb_builder<'d, D: Driver<'d>>(driver: D, usb_config: MouseUsbConfig<'d>) -> Builder<'d, D> {
    // Create embassy-usb Config
    let mut config = embassy_usb::Config::new(usb_config.vid, usb_config.pid);
    config.manufacturer = Some(usb_config.manufacturer);
    config.product = Some(usb_config.product_name);
    config.serial_number = Some(usb_config.serial_number);
    config.max_power = 100;
    config.max_packet_size_0 = 64;

    const USB_BUF_SIZE: usize = 128;

    static CONFIG_DESC: StaticCell<[u8; USB_BUF_SIZE]> = StaticCell::new();
    static BOS_DESC: StaticCell<[u8; 16]> = StaticCell::new();
    static MSOS_DESC: StaticCell<[u8; 16]> = StaticCell::new();
    static CONTROL_BUF: StaticCell<[u8; USB_BUF_SIZE]> = StaticCell::new();

    let mut builder = Builder::new(
        driver,
        config,
        &mut CONFIG_DESC.init([0; USB_BUF_SIZE])[..],
        &mut BOS_DESC.init([0; 16])[..],
        &mut MSOS_DESC.init([0; 16])[..],
        &mut CONTROL_BUF.init([0; USB_BUF_SIZE])[..],
    );

    static DEVICE_HANDLER: StaticCell<UsbDeviceHandler> = StaticCell::new();
    builder.handler(DEVICE_HANDLER.init(UsbDeviceHandler::new()));

    builder
}

/// Add the mouse HID interface to `builder`.
///
/// The class state lives in a static, so the builder must borrow for `'static`
/// and this can be called only once.
pub fn build_usb_hid_writer<D: Driver<'static>>(builder: &mut Builder<'static, D>) -> HidWriter<'static, D, 8> {
    static STATE: StaticCell<State<'static>> = StaticCell::new();

    let hid_config = HidConfig {
        report_descriptor: &REPORT_DESCRIPTOR,
        request_handler: None,
        poll_ms: 1,
        max_packet_size: 8,
        hid_subclass: HidSubclass::No,
        hid_boot_protocol: HidBootProtocol::None,
    };

    HidWriter::new(builder, STATE.init(State::new()), hid_config)
}

pub(crate) struct UsbDeviceHandler {}

impl UsbDeviceHandler {
    fn new() -> Self {
        UsbDeviceHandler {}
    }
}

impl Handler for UsbDeviceHandler {
    fn enabled(&mut self, enabled: bool) {
        if enabled {
            info!("Device enabled");
        } else {
            info!("Device disabled");
            USB_CONFIGURED.store(false, Ordering::Release);
        }
    }

    fn reset(&mut self) {
        info!("Bus reset, the Vbus current limit is 100mA");
        USB_CONFIGURED.store(false, Ordering::Release);
    }

    fn addressed(&mut self, addr: u8) {
        info!("USB address set to: {}", addr);
    }

    fn configured(&mut self, configured: bool) {
        USB_CONFIGURED.store(configured, Ordering::Release);
        if configured {
            info!("Device configured, it may now draw up to the configured current from Vbus.")
        } else {
            info!("Device is no longer configured, the Vbus current limit is 100mA.");
        }
    }

    fn suspended(&mut self, suspended: bool) {
        if suspended {
            info!("Device suspended");
        } else {
            info!("Device resumed");
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::Mutex;

    use embassy_futures::block_on;
    use embassy_usb::driver::{
        Bus, ControlPipe, Direction, Endpoint, EndpointAddress, EndpointAllocError, EndpointIn, EndpointInfo,
        EndpointOut, EndpointType, Event, Unsupported,
    };

    use super::*;
    use crate::MouseButtons;

    /// Packets written to IN endpoints of [`TestDriver`]
    static WRITTEN: Mutex<Vec<Vec<u8>>> = Mutex::new(Vec::new());

    struct TestDriver;
    struct TestEndpoint(EndpointInfo);
    struct TestBus;
    struct TestControlPipe;

    fn endpoint_info(
        ep_type: EndpointType,
        ep_addr: Option<EndpointAddress>,
        dir: Direction,
        max_packet_size: u16,
        interval_ms: u8,
    ) -> EndpointInfo {
        EndpointInfo {
            addr: ep_addr.unwrap_or(EndpointAddress::from_parts(1, dir)),
            ep_type,
            max_packet_size,
            interval_ms,
        }
    }

    impl Driver<'static> for TestDriver {
        type EndpointOut = TestEndpoint;
        type EndpointIn = TestEndpoint;
        type ControlPipe = TestControlPipe;
        type Bus = TestBus;

        fn alloc_endpoint_out(
            &mut self,
            ep_type: EndpointType,
            ep_addr: Option<EndpointAddress>,
            max_packet_size: u16,
            interval_ms: u8,
        ) -> Result<TestEndpoint, EndpointAllocError> {
            Ok(TestEndpoint(endpoint_info(
                ep_type,
                ep_addr,
                Direction::Out,
                max_packet_size,
                interval_ms,
            )))
        }

        fn alloc_endpoint_in(
            &mut self,
            ep_type: EndpointType,
            ep_addr: Option<EndpointAddress>,
            max_packet_size: u16,
            interval_ms: u8,
        ) -> Result<TestEndpoint, EndpointAllocError> {
            Ok(TestEndpoint(endpoint_info(
                ep_type,
                ep_addr,
                Direction::In,
                max_packet_size,
                interval_ms,
            )))
        }

        fn start(self, _control_max_packet_size: u16) -> (TestBus, TestControlPipe) {
            (TestBus, TestControlPipe)
        }
    }

    impl Endpoint for TestEndpoint {
        fn info(&self) -> &EndpointInfo {
            &self.0
        }

        async fn wait_enabled(&mut self) {}
    }

    impl EndpointIn for TestEndpoint {
        async fn write(&mut self, buf: &[u8]) -> Result<(), EndpointError> {
            WRITTEN.lock().unwrap().push(buf.to_vec());
            Ok(())
        }
    }

    impl EndpointOut for TestEndpoint {
        async fn read(&mut self, _buf: &mut [u8]) -> Result<usize, EndpointError> {
            Err(EndpointError::Disabled)
        }
    }

    impl Bus for TestBus {
        async fn enable(&mut self) {}

        async fn disable(&mut self) {}

        async fn poll(&mut self) -> Event {
            core::future::pending().await
        }

        fn endpoint_set_enabled(&mut self, _ep_addr: EndpointAddress, _enabled: bool) {}

        fn endpoint_set_stalled(&mut self, _ep_addr: EndpointAddress, _stalled: bool) {}

        fn endpoint_is_stalled(&mut self, _ep_addr: EndpointAddress) -> bool {
            false
        }

        async fn remote_wakeup(&mut self) -> Result<(), Unsupported> {
            Err(Unsupported)
        }
    }

    impl ControlPipe for TestControlPipe {
        fn max_packet_size(&self) -> usize {
            64
        }

        async fn setup(&mut self) -> [u8; 8] {
            core::future::pending().await
        }

        async fn data_out(&mut self, _buf: &mut [u8], _first: bool, _last: bool) -> Result<usize, EndpointError> {
            Err(EndpointError::Disabled)
        }

        async fn data_in(&mut self, _data: &[u8], _first: bool, _last: bool) -> Result<(), EndpointError> {
            Ok(())
        }

        async fn accept(&mut self) {}

        async fn reject(&mut self) {}

        async fn accept_set_address(&mut self, _addr: u8) {}
    }

    #[test]
    fn test_endpoint_error_mapping() {
        assert_eq!(TransportError::from(EndpointError::Disabled), TransportError::Disabled);
        assert_eq!(
            TransportError::from(EndpointError::BufferOverflow),
            TransportError::BufferOverflow
        );
    }

    #[test]
    fn test_configured_state_follows_handler() {
        let mut handler = UsbDeviceHandler::new();
        handler.configured(true);
        assert!(USB_CONFIGURED.load(Ordering::Acquire));
        handler.reset();
        assert!(!USB_CONFIGURED.load(Ordering::Acquire));
    }

    // The builder helpers init statics, so they're exercised by this test only
    #[test]
    fn test_writer_sends_report_with_id() {
        let mut builder = new_usb_builder(TestDriver, MouseUsbConfig::default());
        let writer = build_usb_hid_writer(&mut builder);
        let mut transport = UsbHidTransport::new(writer);

        let report = MouseReport {
            buttons: MouseButtons::LEFT,
            wheel_delta: -1,
            x_delta: 3,
            y_delta: -2,
        };
        assert_eq!(block_on(transport.send(&report)), Ok(()));
        assert_eq!(block_on(transport.update_battery_level(50)), Ok(()));

        let mut expected = vec![MOUSE_REPORT_ID];
        expected.extend_from_slice(&report.to_bytes());
        assert_eq!(expected.len(), USB_REPORT_SIZE);
        assert_eq!(*WRITTEN.lock().unwrap(), vec![expected]);
    }
}
