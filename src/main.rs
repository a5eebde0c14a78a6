#![no_std]
#![no_main]

use defmt_rtt as _;
use panic_probe as _;
use rtic::app;

use digital_stopwatch::{Edge, EventLine, Pull, SharedStopwatch, StopwatchConfig};
use rp_pico::hal::gpio::{
    bank0::{Gpio10, Gpio11, Gpio12},
    FunctionSioInput, Interrupt, Pin, PinId, PullNone, PullType, PullUp,
};

const CONFIG: StopwatchConfig = StopwatchConfig::DEFAULT;

// Input bias is fixed by the pin types in `init`; keep the config honest.
const _: () = assert!(matches!(CONFIG.line(EventLine::A).pull, Pull::Up));
const _: () = assert!(matches!(CONFIG.line(EventLine::B).pull, Pull::External));
const _: () = assert!(matches!(CONFIG.line(EventLine::C).pull, Pull::Up));

/// Written by the timer and button interrupts, read by the refresh loop.
static STOPWATCH: SharedStopwatch = SharedStopwatch::new();

fn irq_kinds(edge: Edge) -> &'static [Interrupt] {
    match edge {
        Edge::LowLevel => &[Interrupt::LevelLow],
        Edge::AnyChange => &[Interrupt::EdgeLow, Interrupt::EdgeHigh],
        Edge::Falling => &[Interrupt::EdgeLow],
        Edge::Rising => &[Interrupt::EdgeHigh],
    }
}

fn arm<I: PinId, P: PullType>(pin: &mut Pin<I, FunctionSioInput, P>, edge: Edge) {
    for &kind in irq_kinds(edge) {
        pin.clear_interrupt(kind);
        pin.set_interrupt_enabled(kind, true);
    }
}

/// Clears any pending interrupt for `edge` and reports whether there was one.
fn take_fired<I: PinId, P: PullType>(pin: &mut Pin<I, FunctionSioInput, P>, edge: Edge) -> bool {
    let mut fired = false;
    for &kind in irq_kinds(edge) {
        if pin.interrupt_status(kind) {
            pin.clear_interrupt(kind);
            fired = true;
        }
    }
    fired
}

/// Event lines A, B and C.
pub struct Buttons {
    a: Pin<Gpio10, FunctionSioInput, PullUp>,
    b: Pin<Gpio11, FunctionSioInput, PullNone>,
    c: Pin<Gpio12, FunctionSioInput, PullUp>,
}

impl Buttons {
    fn arm(&mut self) {
        arm(&mut self.a, CONFIG.line(EventLine::A).edge);
        arm(&mut self.b, CONFIG.line(EventLine::B).edge);
        arm(&mut self.c, CONFIG.line(EventLine::C).edge);
    }

    /// Lines with a pending interrupt, in [`EventLine::index`] order.
    fn take_fired(&mut self) -> [bool; 3] {
        [
            take_fired(&mut self.a, CONFIG.line(EventLine::A).edge),
            take_fired(&mut self.b, CONFIG.line(EventLine::B).edge),
            take_fired(&mut self.c, CONFIG.line(EventLine::C).edge),
        ]
    }
}

#[app(device = rp_pico::hal::pac, peripherals = true)]
mod app {
    use super::*;
    use cortex_m::delay::Delay;
    use digital_stopwatch::{bind, Binding, CallbackRegistry, MultiplexedBcd, RefreshScheduler};
    use rp_pico::hal::{
        clocks::{init_clocks_and_plls, Clock},
        fugit::ExtU32,
        gpio::{DynPinId, FunctionSioOutput, PullDown},
        sio::Sio,
        timer::{Alarm, Alarm0, Timer},
        watchdog::Watchdog,
    };

    type OutPin = Pin<DynPinId, FunctionSioOutput, PullDown>;
    type Display = RefreshScheduler<MultiplexedBcd<OutPin, OutPin>, Delay>;

    #[shared]
    struct Shared {
        registry: CallbackRegistry<Binding<'static>>,
    }

    #[local]
    struct Local {
        alarm: Alarm0,
        buttons: Buttons,
        display: Display,
    }

    #[init]
    fn init(ctx: init::Context) -> (Shared, Local, init::Monotonics) {
        defmt::info!("digital stopwatch starting");
        let mut pac = ctx.device;
        let mut watchdog = Watchdog::new(pac.WATCHDOG);
        let sio = Sio::new(pac.SIO);

        let external_xtal_freq_hz = 12_000_000u32;
        let clocks = init_clocks_and_plls(
            external_xtal_freq_hz,
            pac.XOSC,
            pac.CLOCKS,
            pac.PLL_SYS,
            pac.PLL_USB,
            &mut pac.RESETS,
            &mut watchdog,
        )
        .ok()
        .unwrap();

        // Bind before the first tick or edge can arrive.
        let mut registry = CallbackRegistry::new();
        if let Err(e) = bind(&mut registry, &STOPWATCH, &CONFIG) {
            defmt::panic!("invalid configuration: {}", e);
        }

        let mut timer = Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);
        let mut alarm = timer.alarm_0().unwrap();
        alarm.schedule(CONFIG.tick_period_us.micros()).unwrap();
        alarm.enable_interrupt();

        let pins = rp_pico::Pins::new(
            pac.IO_BANK0,
            pac.PADS_BANK0,
            sio.gpio_bank0,
            &mut pac.RESETS,
        );

        let mut buttons = Buttons {
            a: pins.gpio10.into_pull_up_input(),
            b: pins.gpio11.into_floating_input(),
            c: pins.gpio12.into_pull_up_input(),
        };
        buttons.arm();

        // GP0..GP5 drive the digit transistors, GP6..GP9 the BCD decoder.
        let enables = [
            pins.gpio0.into_push_pull_output().into_dyn_pin(),
            pins.gpio1.into_push_pull_output().into_dyn_pin(),
            pins.gpio2.into_push_pull_output().into_dyn_pin(),
            pins.gpio3.into_push_pull_output().into_dyn_pin(),
            pins.gpio4.into_push_pull_output().into_dyn_pin(),
            pins.gpio5.into_push_pull_output().into_dyn_pin(),
        ];
        let bcd = [
            pins.gpio6.into_push_pull_output().into_dyn_pin(),
            pins.gpio7.into_push_pull_output().into_dyn_pin(),
            pins.gpio8.into_push_pull_output().into_dyn_pin(),
            pins.gpio9.into_push_pull_output().into_dyn_pin(),
        ];
        let delay = Delay::new(ctx.core.SYST, clocks.system_clock.freq().to_Hz());
        let sink = MultiplexedBcd::new(enables, bcd);
        let display = RefreshScheduler::from_config(sink, delay, &CONFIG);

        (
            Shared { registry },
            Local {
                alarm,
                buttons,
                display,
            },
            init::Monotonics(),
        )
    }

    // Hardware Task: Timer Interrupt (tick period)
    #[task(binds = TIMER_IRQ_0, priority = 1, shared = [registry], local = [alarm])]
    fn timer_tick(mut ctx: timer_tick::Context) {
        // Clear interrupt and schedule next
        ctx.local.alarm.clear_interrupt();
        ctx.local.alarm.schedule(CONFIG.tick_period_us.micros()).unwrap();

        ctx.shared.registry.lock(|r| r.on_tick());
        defmt::trace!("tick {=str}", STOPWATCH.time().hms().as_str());
    }

    // Hardware Task: GPIO Interrupt (reset / pause / resume lines)
    #[task(binds = IO_IRQ_BANK0, priority = 1, shared = [registry], local = [buttons])]
    fn button_press(mut ctx: button_press::Context) {
        let fired = ctx.local.buttons.take_fired();

        ctx.shared.registry.lock(|r| {
            for line in EventLine::ALL {
                if fired[line.index()] {
                    r.on_event(line);
                }
            }
        });
    }

    // Main loop: scan the display forever.
    #[idle(local = [display])]
    fn idle(ctx: idle::Context) -> ! {
        ctx.local.display.run(|| STOPWATCH.display())
    }
}
