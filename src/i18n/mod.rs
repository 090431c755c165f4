//! Internationalization (i18n) module.
//!
//! Provides localized strings for user-facing notices and CLI output.
//! English is the default language; Spanish is available as an alternative.
//! Strings that end up in the outgoing email are never localized.

use std::sync::OnceLock;

static CURRENT_LANG: OnceLock<Lang> = OnceLock::new();

/// Supported languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    /// English (default)
    En,
    /// Spanish
    Es,
}

impl Lang {
    /// Parse a language code string (e.g. "en", "es", "en_US", "es_ES").
    /// Returns `None` for unrecognized codes.
    pub fn from_code(code: &str) -> Option<Self> {
        let normalized = code.to_lowercase();
        let prefix = normalized.split(['_', '-', '.']).next().unwrap_or("");
        match prefix {
            "en" => Some(Self::En),
            "es" => Some(Self::Es),
            _ => None,
        }
    }

    /// Return the ISO 639-1 code for this language.
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
        }
    }
}

/// Initialize the global language. Call once at startup.
/// If already initialized, this is a no-op.
pub fn set_lang(lang: Lang) {
    let _ = CURRENT_LANG.set(lang);
}

/// Get the currently configured language (defaults to English).
pub fn lang() -> Lang {
    CURRENT_LANG.get().copied().unwrap_or(Lang::En)
}

/// Detect language from `CTRLCRAFT_LANG`, `LC_MESSAGES` or `LANG`.
pub fn detect_system_lang() -> Lang {
    std::env::var("CTRLCRAFT_LANG")
        .ok()
        .and_then(|v| Lang::from_code(&v))
        .or_else(|| {
            std::env::var("LC_MESSAGES")
                .ok()
                .and_then(|v| Lang::from_code(&v))
        })
        .or_else(|| std::env::var("LANG").ok().and_then(|v| Lang::from_code(&v)))
        .unwrap_or(Lang::En)
}

/// Macro for defining translatable message functions.
/// Each function returns a `&'static str` based on the current language.
macro_rules! msg {
    ($name:ident, $en:expr, $es:expr) => {
        /// Returns a localized string for the current language.
        pub fn $name() -> &'static str {
            match lang() {
                Lang::En => $en,
                Lang::Es => $es,
            }
        }
    };
}

// ── General ──────────────────────────────────────────────────────

msg!(
    app_about,
    "ctrlcraft \u{2014} Send a custom controller inquiry with reference images.",
    "ctrlcraft \u{2014} Env\u{ed}a una solicitud de mando personalizado con im\u{e1}genes de referencia."
);
msg!(
    app_long_about,
    "ctrlcraft \u{2014} Send a custom controller inquiry with reference images.\nImages are validated, deduplicated and embedded in the email that the\nEmailJS relay delivers to the workshop.",
    "ctrlcraft \u{2014} Env\u{ed}a una solicitud de mando personalizado con im\u{e1}genes de referencia.\nLas im\u{e1}genes se validan, se deduplican y se incrustan en el correo que\nel servicio EmailJS entrega al taller."
);

// ── CLI help strings ─────────────────────────────────────────────

msg!(
    help_cmd_submit,
    "Validate and send an inquiry",
    "Validar y enviar una solicitud"
);
msg!(
    help_cmd_preview,
    "Load images and show the preview list",
    "Cargar im\u{e1}genes y mostrar la vista previa"
);
msg!(
    help_cmd_config,
    "Show or initialize the configuration file",
    "Mostrar o inicializar el fichero de configuraci\u{f3}n"
);
msg!(
    help_cmd_completions,
    "Generate shell completions",
    "Generar autocompletado para la shell"
);
msg!(
    help_cmd_manpage,
    "Generate a man page",
    "Generar p\u{e1}gina de manual"
);

// ── Notices: intake ──────────────────────────────────────────────

msg!(
    notice_intake_busy,
    "Please wait, images are still being processed.",
    "Espera, las im\u{e1}genes a\u{fa}n se est\u{e1}n procesando."
);
msg!(
    notice_not_an_image,
    "is not an image and was skipped.",
    "no es una imagen y se ha omitido."
);
msg!(
    notice_file_too_large,
    "is larger than the size limit of",
    "supera el tama\u{f1}o m\u{e1}ximo de"
);
msg!(
    notice_too_many_images,
    "Too many images selected. Slots remaining:",
    "Demasiadas im\u{e1}genes seleccionadas. Huecos disponibles:"
);
msg!(
    notice_decode_failed,
    "Could not read image",
    "No se pudo leer la imagen"
);
msg!(
    notice_images_uploaded,
    "image(s) uploaded successfully.",
    "imagen(es) subida(s) correctamente."
);
msg!(
    preview_empty,
    "No files selected",
    "Ning\u{fa}n fichero seleccionado"
);

// ── Notices: submission ──────────────────────────────────────────

msg!(
    notice_inquiry_sent,
    "Inquiry sent successfully! I'll contact you soon.",
    "\u{a1}Solicitud enviada! Te contactar\u{e9} pronto."
);
msg!(
    notice_inquiry_failed,
    "Failed to send inquiry. Please try again.",
    "No se pudo enviar la solicitud. Int\u{e9}ntalo de nuevo."
);
msg!(submit_label, "Send Inquiry", "Enviar solicitud");
msg!(submit_sending, "Sending...", "Enviando...");
msg!(msg_redirecting, "Returning to", "Volviendo a");

// ── CLI output ───────────────────────────────────────────────────

msg!(cli_images, "Images", "Im\u{e1}genes");
msg!(cli_total_size, "Total size", "Tama\u{f1}o total");
msg!(cli_config_path, "Config file", "Fichero de configuraci\u{f3}n");
msg!(
    cli_config_written,
    "Default configuration written to",
    "Configuraci\u{f3}n por defecto escrita en"
);
msg!(
    err_file_not_found,
    "File not found",
    "Fichero no encontrado"
);
