//! Pico W networking: CYW43 radio bring-up, DHCP, and join management for
//! the publish pipeline.

#![cfg(feature = "wifi")]

use cyw43::JoinOptions;
use cyw43_pio::{DEFAULT_CLOCK_DIVIDER, PioSpi};
use defmt::info;
use embassy_executor::Spawner;
use embassy_net::{Config, Stack, StackResources};
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::{DMA_CH0, PIN_23, PIN_24, PIN_25, PIN_29, PIO0};
use embassy_rp::pio::{InterruptHandler, Pio};
use embassy_rp::{Peri, bind_interrupts};
use embassy_time::with_timeout;
use static_cell::StaticCell;

use crate::shared_constants::{WIFI_JOIN_TIMEOUT, WIFI_PASS, WIFI_SSID};
use crate::{Error, Result};

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => InterruptHandler<PIO0>;
});

/// The radio control handle plus the network stack, after hardware init.
///
/// Joining is deferred to [`Net::ensure_up`] so a dead access point at boot
/// never stalls the clock; the publish pipeline retries each cycle instead.
pub struct Net {
    control: cyw43::Control<'static>,
    stack: Stack<'static>,
}

impl Net {
    /// Powers the CYW43 up, starts the driver and stack runners, and
    /// configures DHCP. Does not join yet.
    ///
    /// # Errors
    ///
    /// `TaskSpawn` if the runner tasks cannot be spawned.
    pub async fn new(
        spawner: Spawner,
        pin_23: Peri<'static, PIN_23>,
        pin_25: Peri<'static, PIN_25>,
        pio0: Peri<'static, PIO0>,
        pin_24: Peri<'static, PIN_24>,
        pin_29: Peri<'static, PIN_29>,
        dma_ch0: Peri<'static, DMA_CH0>,
    ) -> Result<Self> {
        let fw = cyw43_firmware::CYW43_43439A0;
        let clm = cyw43_firmware::CYW43_43439A0_CLM;

        let pwr = Output::new(pin_23, Level::Low);
        let cs = Output::new(pin_25, Level::High);
        let mut pio = Pio::new(pio0, Irqs);
        let spi = PioSpi::new(
            &mut pio.common,
            pio.sm0,
            DEFAULT_CLOCK_DIVIDER,
            pio.irq0,
            cs,
            pin_24,
            pin_29,
            dma_ch0,
        );

        static STATE: StaticCell<cyw43::State> = StaticCell::new();
        let state = STATE.init(cyw43::State::new());
        let (net_device, mut control, runner) = cyw43::new(state, pwr, spi, fw).await;
        spawner.spawn(wifi_task(runner))?;

        control.init(clm).await;
        control
            .set_power_management(cyw43::PowerManagementMode::PowerSave)
            .await;

        let config = Config::dhcpv4(Default::default());
        let seed = 0x7c8f_3a2e_9d14_6b5a;

        static RESOURCES: StaticCell<StackResources<5>> = StaticCell::new();
        let (stack, runner) =
            embassy_net::new(net_device, config, RESOURCES.init(StackResources::new()), seed);
        spawner.spawn(net_task(runner))?;

        Ok(Self { control, stack })
    }

    #[must_use]
    pub const fn stack(&self) -> Stack<'static> {
        self.stack
    }

    /// Whether the link is joined and DHCP-configured.
    #[must_use]
    pub fn is_up(&self) -> bool {
        self.stack.is_config_up()
    }

    /// Joins the configured network and waits for DHCP, bounded by
    /// [`WIFI_JOIN_TIMEOUT`].
    ///
    /// # Errors
    ///
    /// `JoinFailed` on association failure, `Timeout` when DHCP stalls.
    pub async fn ensure_up(&mut self) -> Result<()> {
        if self.is_up() {
            return Ok(());
        }
        info!("Joining WiFi: {}", WIFI_SSID);
        with_timeout(
            WIFI_JOIN_TIMEOUT,
            self.control
                .join(WIFI_SSID, JoinOptions::new(WIFI_PASS.as_bytes())),
        )
        .await?
        .map_err(|_| Error::JoinFailed)?;

        info!("Joined, waiting for DHCP...");
        with_timeout(WIFI_JOIN_TIMEOUT, self.stack.wait_config_up()).await?;
        if let Some(config) = self.stack.config_v4() {
            info!("IP address: {}", config.address);
        }
        Ok(())
    }
}

#[embassy_executor::task]
async fn wifi_task(
    runner: cyw43::Runner<'static, Output<'static>, PioSpi<'static, PIO0, 0, DMA_CH0>>,
) -> ! {
    runner.run().await
}

#[embassy_executor::task]
async fn net_task(mut runner: embassy_net::Runner<'static, cyw43::NetDriver<'static>>) -> ! {
    runner.run().await
}
