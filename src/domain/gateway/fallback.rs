//! Canned per-language degradation strings.

use crate::domain::foundation::Language;

/// The apology/contact-support string for a language.
///
/// Unsupported or absent languages resolve to the English string via
/// `Language`'s lenient parsing and default.
pub fn apology(language: Language) -> &'static str {
    match language {
        Language::En => {
            "I apologize, but I'm currently unable to process your request. \
             Please contact our support team for assistance."
        }
        Language::PtBr => {
            "Peço desculpas, mas não consigo processar sua solicitação no momento. \
             Entre em contato com nossa equipe de suporte."
        }
        Language::Es => {
            "Me disculpo, pero actualmente no puedo procesar su solicitud. \
             Por favor contacte a nuestro equipo de soporte."
        }
        Language::Ru => {
            "Извините, но я не могу обработать ваш запрос в данный момент. \
             Пожалуйста, свяжитесь с нашей службой поддержки."
        }
    }
}
