use log::{debug, info};

use crate::{
    commands::{mtk, sirf},
    config::GpsProvider,
    constants::GPS_NMEA_CONFIG_DELAY_MS,
    transport::{Clock, SerialTransport},
};

use super::{GpsDriver, GpsState};

#[derive(Debug, Clone, Copy)]
enum ConfigStep {
    /// Stream the command through the auto-config sender
    Transmit(&'static [u8]),
    /// Wait for an empty transmit buffer, then print the command in one go
    Companion(&'static [u8]),
}

const MTK_STEPS: [ConfigStep; 4] = [
    ConfigStep::Transmit(mtk::REPORT_RATE_5HZ),
    ConfigStep::Companion(mtk::REPORT_RATE_5HZ),
    ConfigStep::Transmit(mtk::UPDATE_RATE_5HZ),
    ConfigStep::Companion(mtk::UPDATE_RATE_5HZ),
];

// report rate change is disabled for SiRF
const SIRF_STEPS: [ConfigStep; 1] = [ConfigStep::Transmit(sirf::UPDATE_RATE_5HZ)];

impl<T: SerialTransport, C: Clock> GpsDriver<T, C> {
    pub(super) fn configure(&mut self) -> bool {
        match self.config.provider {
            GpsProvider::Nmea => self.configure_mtk(),
            GpsProvider::NmeaSirf => self.configure_sirf(),
        }
    }

    /// MediaTek sequence: report rate then update rate, each followed by its
    /// companion send. Always returns `false`.
    pub fn configure_mtk(&mut self) -> bool {
        self.run_config_steps(&MTK_STEPS)
    }

    /// SiRF sequence: update rate only. Always returns `false`.
    pub fn configure_sirf(&mut self) -> bool {
        self.run_config_steps(&SIRF_STEPS)
    }

    fn run_config_steps(&mut self, steps: &[ConfigStep]) -> bool {
        if !self.dwell_elapsed(GPS_NMEA_CONFIG_DELAY_MS) {
            return false;
        }

        let done = match steps.get(self.auto_config_step) {
            Some(&ConfigStep::Transmit(cmd)) => self.transmit_auto_config_command(cmd),
            Some(&ConfigStep::Companion(cmd)) => match self.port.as_mut() {
                Some(port) if port.is_tx_empty() => {
                    port.print(cmd);
                    true
                },
                _ => false,
            },
            None => {
                self.set_state(GpsState::ReceivingData);
                info!("GPS configured, receiving data");
                return false;
            },
        };

        if done {
            let step = self.auto_config_step;
            debug!("GPS config step {step} sent");
            // entering Configure from CheckVersion zeroes the step, so bump it afterwards
            self.set_state(GpsState::Configure);
            self.auto_config_step = step + 1;
        }
        false
    }
}
