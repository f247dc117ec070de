#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

#[cfg(target_os = "none")]
mod firmware {
    use core::fmt::Write;
    use core::mem::MaybeUninit;
    use core::panic::PanicInfo;
    use core::ptr::addr_of_mut;

    // provides _start symbol
    use riscv_rt::entry;
    use embedded_alloc::Heap;

    #[allow(unused_imports)]
    use log::{debug, error, info, trace, warn};
    use peripherals::{logger::*, system, uart::JtagUart};

    use avdemo::Board;
    use player::{Builder, UploadMode};

    #[global_allocator]
    static HEAP: Heap = Heap::empty();
    // memory blocks hold whole media files
    const HEAP_SIZE: usize = 16 * 1024 * 1024;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];

    const LOG_LEVEL: LevelFilter = LevelFilter::Info;

    #[entry]
    fn main() -> ! {
        unsafe { HEAP.init(addr_of_mut!(HEAP_MEM) as usize, HEAP_SIZE) }

        let logger = create_uart_logger(LOG_LEVEL, system::UART_BASE);
        unsafe { init(&logger).expect("Failed installing logger") }
        info!("init process started");

        let board = unsafe { Board::take() };
        let mut player = Builder::new()
            .with_context(board)
            .with_clock_frequency(system::CLK_FREQ)
            .with_upload_mode(UploadMode::Blocking)
            .build()
            .expect("Failed building player");

        info!("heap: {} bytes, console ready", HEAP_SIZE);
        player.run()
    }

    #[panic_handler]
    fn panic_handler(info: &PanicInfo) -> ! {
        let mut uart = unsafe { JtagUart::new(system::UART_BASE) };
        let _ = writeln!(uart, "\npanic: {}", info);
        loop {
            continue;
        }
    }
}

#[cfg(not(target_os = "none"))]
fn main() {
    println!("This firmware runs on the FPGA soft core. Build it with `--target riscv32imac-unknown-none-elf`.");
}
