//! Deterministic responder used when no generative provider answers.
//!
//! An ordered table of `(predicate, template)` rules evaluated against the
//! lowercased message. The first match wins and the last rule always matches,
//! so [`fallback_reply`] can not fail.

use super::prompts::{Language, detect_language};

struct FallbackRule {
    name: &'static str,
    matches: fn(&str) -> bool,
    english: &'static str,
    turkish: &'static str,
}

fn has_word(message: &str, words: &[&str]) -> bool {
    message
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| words.contains(&word))
}

fn has_any(message: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| message.contains(needle))
}

fn is_greeting(message: &str) -> bool {
    has_word(message, &["hello", "hi", "hey", "merhaba", "selam"])
}

fn is_vomit(message: &str) -> bool {
    has_any(message, &["kusma", "vomit", "kustu", "kusuyor"])
}

fn is_spoiled_food_vomit(message: &str) -> bool {
    is_vomit(message) && has_any(message, &["bozuk", "spoiled", "çürük", "toksik"])
}

fn is_vaccination(message: &str) -> bool {
    has_any(message, &["aşı", "vaccin"])
}

fn is_sick(message: &str) -> bool {
    has_any(message, &["hasta", "sick", "rahatsız"]) || has_word(message, &["ill"])
}

fn is_food(message: &str) -> bool {
    has_any(message, &["yemek", "food", "beslenme", "diet", "mama"])
}

fn is_behavior(message: &str) -> bool {
    has_any(message, &["davranış", "behavior", "aggressive", "saldırgan"])
}

fn is_pain(message: &str) -> bool {
    has_any(message, &["ağrı", "acı", "pain", "hurt"])
}

fn is_diarrhea(message: &str) -> bool {
    has_any(message, &["ishal", "diarrhea", "sulu dışkı"])
}

const FALLBACK_RULES: &[FallbackRule] = &[
    FallbackRule {
        name: "greeting",
        matches: is_greeting,
        english: "Hello! I'm your AI veterinary assistant. I'm here to help you with questions about your pet's health. How can I help you?",
        turkish: "Merhaba! Ben AI veteriner asistanınızım. Evcil hayvanınızın sağlığı hakkında sorularınızda size yardımcı olmak için buradayım. Size nasıl yardımcı olabilirim?",
    },
    FallbackRule {
        name: "spoiled_food_vomit",
        matches: is_spoiled_food_vomit,
        english: "Eating spoiled food can be serious. Here is what you should do right away:

1. **Emergency**: If your pet keeps vomiting, is lethargic or has trouble breathing, take it to a veterinary clinic IMMEDIATELY.

2. **First aid**:
   - Do not give water (for at least 2-3 hours)
   - Do not give food
   - Keep your pet calm and watch it closely

3. **Observation**: Note how often it vomits, the color, and your pet's general condition.

4. **Vet visit**: See a veterinarian as soon as possible. Spoiled food can cause poisoning.

Please monitor your pet closely and go to an emergency clinic if you notice serious symptoms.",
        turkish: "Bozuk et yemesi ciddi bir durum olabilir. Hemen şunları yapmalısınız:

1. **Acil Durum**: Eğer evcil hayvanınız sürekli kusuyorsa, halsizse veya nefes almakta zorlanıyorsa DERHAL bir veteriner kliniğine götürün.

2. **İlk Yardım**:
   - Su vermeyin (en az 2-3 saat)
   - Yiyecek vermeyin
   - Evcil hayvanınızı sakin tutun ve gözlemleyin

3. **Gözlem**: Kusma sıklığını, rengini ve genel durumunu not edin.

4. **Veteriner Ziyareti**: Mümkün olan en kısa sürede bir veterinere danışın. Bozuk gıda zehirlenmeye neden olabilir.

Lütfen evcil hayvanınızın durumunu yakından takip edin ve ciddi belirtiler görürseniz acil servise götürün.",
    },
    FallbackRule {
        name: "vomit",
        matches: is_vomit,
        english: "I understand you're worried about your pet vomiting. Vomiting can have many causes:

**Possible causes:**
- Eating spoiled food
- A change in diet
- Stomach upset
- Infection
- Poisoning

**What you should do:**
1. Keep your pet away from food and water for 2-3 hours
2. Watch how often it vomits and the color
3. Check its general condition (lethargy, fever, etc.)
4. If the vomiting continues or your pet gets worse, contact a veterinarian IMMEDIATELY

Could you tell me more? What did your pet eat, when did it vomit, and are there other symptoms?",
        turkish: "Kusma sorunu yaşayan evcil hayvanınız için endişelendiğinizi anlıyorum. Kusma birçok nedenden kaynaklanabilir:

**Olası Nedenler:**
- Bozuk gıda tüketimi
- Beslenme değişikliği
- Mide rahatsızlığı
- Enfeksiyon
- Zehirlenme

**Ne Yapmalısınız:**
1. Evcil hayvanınızı 2-3 saat yiyecek ve içecekten uzak tutun
2. Kusma sıklığını ve rengini gözlemleyin
3. Genel durumunu kontrol edin (halsizlik, ateş, vb.)
4. Eğer kusma devam ederse veya durumu kötüleşirse DERHAL bir veterinere başvurun

Daha fazla bilgi verebilir misiniz? Ne yedi, ne zaman kustu ve başka belirtiler var mı?",
    },
    FallbackRule {
        name: "vaccination",
        matches: is_vaccination,
        english: "Vaccines are very important for your pet's health. Regular vaccination protects against common diseases. I recommend building a vaccination plan based on your pet's age, breed and health, and checking the schedule with your veterinarian. Would you like more information about a specific vaccine?",
        turkish: "Aşılar evcil hayvanınızın sağlığı için çok önemlidir. Düzenli aşılar, yaygın hastalıklara karşı koruma sağlar. Evcil hayvanınızın yaşına, cinsine ve sağlık durumuna göre bir aşı programı oluşturmanızı öneririm. Veterinerinizle aşı takvimini kontrol etmenizi tavsiye ederim. Belirli aşılar hakkında daha fazla bilgi ister misiniz?",
    },
    FallbackRule {
        name: "sick",
        matches: is_sick,
        english: "I'm sorry to hear your pet is sick. Could you describe the symptoms in more detail?

**Serious signs** (need a veterinarian right away):
- Difficulty breathing
- Severe vomiting or diarrhea
- Loss of consciousness
- Seizures
- Extreme lethargy

If you share the symptoms I can help you better. In an emergency, please go to a veterinary clinic or emergency service immediately.",
        turkish: "Evcil hayvanınızın hasta olduğunu duyduğuma üzüldüm. Bana belirtileri daha detaylı anlatabilir misiniz?

**Ciddi Durumlar** (derhal veteriner gerektirir):
- Nefes almada zorluk
- Şiddetli kusma veya ishal
- Bilinç kaybı
- Nöbet geçirme
- Aşırı halsizlik

Belirtileri paylaşırsanız size daha iyi yardımcı olabilirim. Acil durumlarda lütfen derhal bir veteriner kliniğine veya acil servise başvurun.",
    },
    FallbackRule {
        name: "food",
        matches: is_food,
        english: "Good nutrition is essential for your pet's health. The right diet depends on your pet's age, breed and health. We can talk about general feeding guidelines, but for specific advice I recommend asking your veterinarian. Could you tell me your pet's age, breed and any special needs?",
        turkish: "Doğru beslenme, evcil hayvanınızın sağlığı için çok önemlidir. Doğru diyet, evcil hayvanınızın yaşına, cinsine ve sağlık durumuna bağlıdır. Genel beslenme yönergeleri hakkında konuşabiliriz, ancak özel öneriler için veterinerinize danışmanızı öneririm. Evcil hayvanınızın yaşı, cinsi ve özel ihtiyaçları hakkında bilgi verebilir misiniz?",
    },
    FallbackRule {
        name: "behavior",
        matches: is_behavior,
        english: "Behavior problems can have many causes. Changes in behavior may point to health issues, stress or environmental factors. Could you describe the specific behavior that worries you? For serious behavior problems, a consultation with a veterinarian or an animal behaviorist will help.",
        turkish: "Davranış sorunları çeşitli nedenlerden kaynaklanabilir. Davranış değişiklikleri sağlık sorunları, stres veya çevresel faktörleri gösterebilir. Endişelendiğiniz belirli davranışı tarif edebilir misiniz? Ciddi davranış sorunları için bir veteriner veya hayvan davranış uzmanı ile konsültasyon yararlı olacaktır.",
    },
    FallbackRule {
        name: "pain",
        matches: is_pain,
        english: "If you think your pet is in pain, this is serious. Signs of pain can include:
- Lethargy or less activity
- Loss of appetite
- Restlessness
- Licking or biting a specific area
- Aggressive behavior

Please contact a veterinarian right away. Never give pain medication on your own, some human medicines are toxic to pets.",
        turkish: "Evcil hayvanınızın ağrı çektiğini düşünüyorsanız, bu ciddi bir durumdur. Ağrı belirtileri şunları içerebilir:
- Halsizlik veya aktivite azalması
- İştah kaybı
- Huzursuzluk
- Belirli bölgeleri yalama veya ısırma
- Agresif davranış

Lütfen derhal bir veterinere başvurun. Ağrı kesici ilaçları asla kendi başınıza vermeyin, bazıları evcil hayvanlar için zehirli olabilir.",
    },
    FallbackRule {
        name: "diarrhea",
        matches: is_diarrhea,
        english: "I understand you're worried about your pet's diarrhea. Diarrhea can have several causes:

**Possible causes:**
- A change in diet
- Spoiled food
- Parasites
- Infection
- Stress

**What you should do:**
1. Offer light, easy to digest food (boiled chicken, rice)
2. Provide plenty of water to prevent dehydration
3. Call your veterinarian if the diarrhea lasts more than 24 hours
4. Call your veterinarian IMMEDIATELY if there is blood or your pet is very weak

How is your pet doing? Are there other symptoms?",
        turkish: "İshal sorunu yaşayan evcil hayvanınız için endişelendiğinizi anlıyorum. İshal birkaç nedenden kaynaklanabilir:

**Olası Nedenler:**
- Beslenme değişikliği
- Bozuk gıda
- Parazitler
- Enfeksiyon
- Stres

**Ne Yapmalısınız:**
1. Hafif, sindirimi kolay yiyecekler verin (haşlanmış tavuk, pilav)
2. Bol su verin (dehidrasyonu önlemek için)
3. İshal 24 saatten fazla sürerse veterineri arayın
4. Kan varsa veya çok halsizse DERHAL veterineri arayın

Evcil hayvanınızın durumu nasıl? Başka belirtiler var mı?",
    },
    FallbackRule {
        name: "default",
        matches: |_| true,
        english: "I understand you're asking about \"{message}\". To help you better, please share:

1. **Details**: What happened and when did it start?
2. **Symptoms**: What symptoms do you see in your pet?
3. **Behavior changes**: Has your pet's behavior changed?
4. **Recent events**: Any recent change in diet, environment or routine?

With this information I can give you more specific advice. For emergencies, please contact a veterinarian immediately.",
        turkish: "Anladım, \"{message}\" hakkında soru soruyorsunuz. Size daha iyi yardımcı olabilmem için lütfen şu bilgileri paylaşın:

1. **Sorunun detayları**: Ne oldu, ne zaman başladı?
2. **Belirtiler**: Evcil hayvanınızda hangi belirtileri görüyorsunuz?
3. **Davranış değişiklikleri**: Davranışında değişiklik var mı?
4. **Yakın zamanda olanlar**: Son zamanlarda beslenme, çevre veya rutinde değişiklik oldu mu?

Bu bilgileri paylaşırsanız size daha spesifik önerilerde bulunabilirim. Acil durumlar için lütfen derhal bir veterinere başvurun.",
    },
];

/// Lowercases with the Turkish dotted capital folded to a plain `i`, which
/// `to_lowercase` would turn into `i` plus a combining dot
fn fold_case(message: &str) -> String {
    message.replace('İ', "i").to_lowercase()
}

fn matching_rule(message: &str) -> &'static FallbackRule {
    let lowered = fold_case(message);
    FALLBACK_RULES
        .iter()
        .find(|rule| (rule.matches)(&lowered))
        .unwrap_or(&FALLBACK_RULES[FALLBACK_RULES.len() - 1])
}

/// Name of the rule that answers `message`, e.g. `vomit` or `default`
pub fn fallback_topic(message: &str) -> &'static str {
    matching_rule(message).name
}

/// Canned reply in the language of the message
pub fn fallback_reply(message: &str) -> String {
    let rule = matching_rule(message);
    let template = match detect_language(message) {
        Language::English => rule.english,
        Language::Turkish => rule.turkish,
    };

    template.replace("{message}", message.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_first_match_wins() {
        assert_eq!(fallback_topic("Hi, my dog is vomiting"), "greeting");
        assert_eq!(fallback_topic("He vomited after eating spoiled meat"), "spoiled_food_vomit");
        assert_eq!(fallback_topic("köpeğim kusuyor"), "vomit");
        assert_eq!(fallback_topic("When is the next vaccination?"), "vaccination");
        assert_eq!(fallback_topic("my cat seems sick"), "sick");
        assert_eq!(fallback_topic("which food is best"), "food");
        assert_eq!(fallback_topic("he is aggressive with guests"), "behavior");
        assert_eq!(fallback_topic("she is in pain"), "pain");
        assert_eq!(fallback_topic("ishal oldu"), "diarrhea");
        assert_eq!(fallback_topic("my parrot talks too much"), "default");
    }

    #[test]
    fn test_dotted_capital_i_matches_turkish_keywords() {
        assert_eq!(fold_case("İshal var"), "ishal var");
        assert_eq!(fallback_topic("İshal var"), "diarrhea");
        assert!(fallback_reply("İshal var").starts_with("İshal sorunu"));
    }

    #[test]
    fn test_greeting_needs_whole_word() {
        assert_eq!(fallback_topic("this dog is hiding all day"), "default");
        assert_eq!(fallback_topic("he will not play"), "default");
        assert_eq!(fallback_topic("Selam!"), "greeting");
    }

    #[test]
    fn test_reply_language_follows_message() {
        assert!(fallback_reply("my dog has diarrhea").starts_with("I understand"));
        assert!(fallback_reply("köpeğimde ishal var").starts_with("İshal sorunu"));
    }

    #[test]
    fn test_default_quotes_the_message() {
        let reply = fallback_reply("  my parrot talks too much ");

        assert!(reply.contains("\"my parrot talks too much\""));
        assert!(!reply.contains("{message}"));
    }

    #[test]
    fn test_every_input_gets_a_reply() {
        for message in ["", " ", "🐶", "{message}"] {
            assert!(!fallback_reply(message).is_empty());
        }
    }
}
