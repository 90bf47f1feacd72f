//! Static catalog data served to the front-end

/// Supported language codes and their display labels
pub const LANGUAGES: &[(&str, &str)] = &[
    ("hi", "🇮🇳 Hindi"),
    ("bn", "🇧🇩 Bengali"),
    ("te", "🇮🇳 Telugu"),
    ("ta", "🇮🇳 Tamil"),
    ("mr", "🇮🇳 Marathi"),
    ("gu", "🇮🇳 Gujarati"),
    ("kn", "🇮🇳 Kannada"),
    ("ml", "🇮🇳 Malayalam"),
    ("pa", "🇮🇳 Punjabi"),
    ("ur", "🇵🇰 Urdu"),
    ("en", "🇺🇸 English (US)"),
    ("en-uk", "🇬🇧 English (UK)"),
    ("es", "🇪🇸 Spanish"),
    ("fr", "🇫🇷 French"),
    ("de", "🇩🇪 German"),
    ("ar", "🇸🇦 Arabic"),
];

pub const VOICE_TYPES: &[(&str, &str)] = &[
    ("female1", "Professional Female"),
    ("female2", "Young Female"),
    ("male1", "Professional Male"),
    ("male2", "Deep Male"),
    ("emotional", "Emotional"),
];

const DEFAULT_PREVIEW: &str = "Hello! This is a preview of the selected voice.";

const PREVIEW_SENTENCES: &[(&str, &str)] = &[
    ("hi", "नमस्ते! यह चुनी हुई आवाज़ का एक नमूना है।"),
    ("bn", "নমস্কার! এটি নির্বাচিত কণ্ঠের একটি নমুনা।"),
    ("te", "నమస్కారం! ఇది ఎంచుకున్న స్వరం యొక్క నమూనా."),
    ("ta", "வணக்கம்! இது தேர்ந்தெடுக்கப்பட்ட குரலின் மாதிரி."),
    ("mr", "नमस्कार! हा निवडलेल्या आवाजाचा नमुना आहे."),
    ("gu", "નમસ્તે! આ પસંદ કરેલા અવાજનો નમૂનો છે."),
    ("kn", "ನಮಸ್ಕಾರ! ಇದು ಆಯ್ಕೆ ಮಾಡಿದ ಧ್ವನಿಯ ಮಾದರಿ."),
    ("ml", "നമസ്കാരം! ഇത് തിരഞ്ഞെടുത്ത ശബ്ദത്തിന്റെ ഒരു മാതൃകയാണ്."),
    ("pa", "ਸਤ ਸ੍ਰੀ ਅਕਾਲ! ਇਹ ਚੁਣੀ ਗਈ ਆਵਾਜ਼ ਦਾ ਨਮੂਨਾ ਹੈ।"),
    ("ur", "السلام علیکم! یہ منتخب آواز کا ایک نمونہ ہے۔"),
    ("en-uk", "Hello! This is a preview of the selected voice."),
    ("es", "¡Hola! Esta es una muestra de la voz seleccionada."),
    ("fr", "Bonjour ! Ceci est un aperçu de la voix sélectionnée."),
    ("de", "Hallo! Dies ist eine Vorschau der ausgewählten Stimme."),
    ("ar", "مرحبا! هذه معاينة للصوت المختار."),
];

/// Short sample sentence used by voice previews
pub fn preview_sentence(language: &str) -> &'static str {
    PREVIEW_SENTENCES
        .iter()
        .find(|(code, _)| *code == language)
        .map(|(_, sentence)| *sentence)
        .unwrap_or(DEFAULT_PREVIEW)
}
