/// success messages
#[macro_export]
macro_rules! yay {
    ($($arg:tt)*) => {{
        println!("{}[+] {}", $crate::better_term::Color::BrightGreen, format!($($arg)*));
        $crate::better_term::flush_styles();
    }};
}

/// general information
#[macro_export]
macro_rules! say {
    ($($arg:tt)*) => {{
        println!("{}[*] {}", $crate::better_term::Color::BrightCyan, format!($($arg)*));
        $crate::better_term::flush_styles();
    }};
}

/// something looks off but the bot keeps going
#[macro_export]
macro_rules! hey {
    ($($arg:tt)*) => {{
        println!("{}[!] {}", $crate::better_term::Color::BrightYellow, format!($($arg)*));
        $crate::better_term::flush_styles();
    }};
}

/// errors, printed to stderr
#[macro_export]
macro_rules! nay {
    ($($arg:tt)*) => {{
        eprintln!("{}[-] {}", $crate::better_term::Color::BrightRed, format!($($arg)*));
        $crate::better_term::flush_styles();
    }};
}
