use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MatchError, Result};

/// One FAQ rule: every word of `topic` must occur in a question for `answer`
/// to be given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeEntry {
    topic: Vec<String>,
    answer: String,
}

impl KnowledgeEntry {
    /// Build an entry from a whitespace-separated topic phrase. Words are
    /// lower-cased; an empty phrase or answer is rejected.
    pub fn new(topic: &str, answer: impl Into<String>) -> Result<Self> {
        let words: Vec<String> = topic.split_whitespace().map(str::to_lowercase).collect();
        if words.is_empty() {
            return Err(MatchError::InvalidInput(
                "knowledge entry topic must contain at least one word".to_string(),
            ));
        }

        let answer = answer.into();
        if answer.trim().is_empty() {
            return Err(MatchError::InvalidInput(format!(
                "knowledge entry '{}' has an empty answer",
                words.join(" ")
            )));
        }

        Ok(Self {
            topic: words,
            answer,
        })
    }

    pub fn topic_words(&self) -> &[String] {
        &self.topic
    }

    pub fn topic_phrase(&self) -> String {
        self.topic.join(" ")
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }
}

/// Ordered, immutable set of FAQ rules. Iteration order decides the order in
/// which answers are joined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
}

impl KnowledgeBase {
    pub fn new(entries: Vec<KnowledgeEntry>) -> Self {
        Self { entries }
    }

    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let entries = pairs
            .into_iter()
            .map(|(topic, answer)| KnowledgeEntry::new(topic, answer))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { entries })
    }

    /// The climate FAQ the site ships with.
    pub fn builtin() -> Self {
        // Every row is a valid entry; `builtin_keeps_every_entry_in_order`
        // pins the count.
        let entries: Vec<KnowledgeEntry> = BUILTIN_FAQ
            .iter()
            .filter_map(|(topic, answer)| KnowledgeEntry::new(topic, *answer).ok())
            .collect();
        debug_assert_eq!(entries.len(), BUILTIN_FAQ.len(), "invalid built-in FAQ row");
        Self { entries }
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A knowledge base that can be replaced while readers are using it.
///
/// Readers take a [`snapshot`](Self::snapshot) and match against it; a
/// concurrent [`replace`](Self::replace) publishes a whole new base and never
/// mutates one that is already handed out.
#[derive(Debug, Default)]
pub struct SharedKnowledgeBase {
    current: RwLock<Arc<KnowledgeBase>>,
}

impl SharedKnowledgeBase {
    pub fn new(kb: KnowledgeBase) -> Self {
        Self {
            current: RwLock::new(Arc::new(kb)),
        }
    }

    pub fn snapshot(&self) -> Arc<KnowledgeBase> {
        // The guarded value is a single Arc, so a poisoned lock still holds a
        // complete snapshot.
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Publish `kb` and return the snapshot it replaced.
    pub fn replace(&self, kb: KnowledgeBase) -> Arc<KnowledgeBase> {
        let next = Arc::new(kb);
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        debug!(
            previous_entries = guard.len(),
            entries = next.len(),
            "knowledge base replaced"
        );
        std::mem::replace(&mut *guard, next)
    }

    pub fn reload_from(&self, path: &Path) -> Result<Arc<KnowledgeBase>> {
        let kb = load_knowledge_jsonl(path)?;
        Ok(self.replace(kb))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct KnowledgeLine {
    topic: String,
    answer: String,
}

pub fn load_knowledge_jsonl(path: &Path) -> Result<KnowledgeBase> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut entries = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let raw: KnowledgeLine =
            serde_json::from_str(&line).map_err(|source| MatchError::Parse {
                path: path.display().to_string(),
                line: idx + 1,
                source,
            })?;
        let entry = KnowledgeEntry::new(&raw.topic, raw.answer).map_err(|err| {
            MatchError::InvalidInput(format!("{}:{}: {err}", path.display(), idx + 1))
        })?;
        entries.push(entry);
    }

    debug!(path = %path.display(), entries = entries.len(), "loaded knowledge base");
    Ok(KnowledgeBase::new(entries))
}

pub fn save_knowledge_jsonl(path: &Path, kb: &KnowledgeBase) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    for entry in kb.entries() {
        let line = serde_json::to_string(&KnowledgeLine {
            topic: entry.topic_phrase(),
            answer: entry.answer.clone(),
        })?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
    }

    writer.flush()?;
    Ok(())
}

const BUILTIN_FAQ: &[(&str, &str)] = &[
    ("озеленение городов", "Озеленение городов помогает снижать температуру, очищать воздух и улучшать качество жизни."),
    ("загрязнение воздуха", "Загрязнение воздуха происходит из-за выбросов транспорта, промышленности и сжигания отходов."),
    ("загрязнение воды", "Загрязнение воды связано с промышленными сбросами, пластиком и химикатами, попадающими в реки и океаны."),
    ("перепроизводство", "Перепроизводство приводит к избыточному потреблению ресурсов и образованию ненужных отходов."),
    ("быстрая мода", "Быстрая мода — это производство дешёвой и краткосрочной одежды, наносящее вред окружающей среде."),
    ("световое загрязнение", "Световое загрязнение — избыточный искусственный свет, мешающий экосистемам и человеку."),
    ("шумовое загрязнение", "Шумовое загрязнение влияет на здоровье людей и животных, особенно в городах."),
    ("углеродная нейтральность", "Углеродная нейтральность — состояние, при котором все выбросы компенсируются мерами по их поглощению."),
    ("электромобили", "Электромобили работают на электричестве, не производят выхлопных газов и снижают загрязнение воздуха."),
    ("гибридные автомобили", "Гибридные авто сочетают бензиновый и электрический двигатель для повышения эффективности и снижения выбросов."),
    ("водородная энергия", "Водород может использоваться как чистое топливо, выделяющее только водяной пар при сгорании."),
    ("зеленое строительство", "Зелёное строительство включает энергоэффективные здания и использование экологичных материалов."),
    ("экотуризм", "Экотуризм — это путешествия с минимальным воздействием на природу и уважением к культуре местных жителей."),
    ("энергетическая эффективность", "Энергетическая эффективность — получение того же результата с меньшими затратами энергии."),
    ("сельское хозяйство и климат", "Сельское хозяйство влияет на климат через выбросы метана, удобрения и изменение земель."),
    ("органическое земледелие", "Органическое земледелие исключает синтетические удобрения и поддерживает здоровье почв и экосистем."),
    ("агролесоводство", "Агролесоводство — сочетание земледелия и посадки деревьев для устойчивого использования земли."),
    ("восстановление экосистем", "Восстановление экосистем — это меры по возвращению природе её первоначального состояния."),
    ("глобальное потепление и здоровье", "Изменение климата повышает риск заболеваний, тепловых волн и нехватки чистой воды."),
    ("ледники", "Ледники тают из-за повышения температуры, что повышает уровень мирового океана."),
    ("заболачивание", "Заболачивание может быть последствием повышения уровня воды или нарушения дренажа почвы."),
    ("деградация почв", "Деградация почв ухудшает их плодородие из-за вырубки, химии и эрозии."),
    ("засуха", "Засуха — длительный период без осадков, усиливающий нехватку воды и бедствия в сельском хозяйстве."),
    ("наводнения", "Наводнения — результат сильных дождей или подъёма уровня воды, часто усиливаются из-за изменения климата."),
    ("лесные пожары", "Пожары в лесах участились из-за жары и засух, они уничтожают экосистемы и ухудшают качество воздуха."),
    ("глобальное потепление и океан", "Потепление вызывает повышение температуры океана, гибель кораллов и миграции морских видов."),
    ("коралловые рифы", "Кораллы страдают от потепления воды и загрязнений, что угрожает морскому биоразнообразию."),
    ("переносимые болезнями комары", "Изменение климата расширяет ареал комаров, переносящих малярию и лихорадку денге."),
    ("углеродный бюджет", "Углеродный бюджет — это максимальное количество CO₂, которое можно выбросить, чтобы не превысить порог потепления."),
    ("циркулярная экономика", "Циркулярная экономика стремится к повторному использованию и переработке вместо производства отходов."),
    ("переход на зелёную энергетику", "Переход на зелёную энергетику включает отказ от ископаемого топлива в пользу возобновляемых источников."),
    ("погодные аномалии", "Погодные аномалии — необычные погодные явления, такие как сильная жара или ливни, связанные с изменением климата."),
    ("озеленение крыш", "Зелёные крыши снижают перегрев городов, очищают воздух и сохраняют влагу."),
    ("урожай и климат", "Сбои в климате могут нарушать сроки посева и снижать урожайность."),
    ("экослед пищи", "Продукты питания имеют разный экологический след, в том числе по выбросам, воде и земле."),
    ("местные продукты", "Покупка местных продуктов снижает транспортные выбросы и поддерживает местную экономику."),
    ("вегетарианство и климат", "Уменьшение потребления мяса снижает выбросы парниковых газов и давление на ресурсы."),
    ("разделение мусора", "Разделение мусора помогает эффективной переработке и снижает количество отходов."),
    ("день Земли", "День Земли отмечается 22 апреля и посвящён защите природы и климата."),
    ("зелёный патруль", "Зелёный патруль — добровольное участие граждан в наблюдении и защите окружающей среды."),
    ("глобальные климатические соглашения", "Климатические соглашения, такие как Парижское, направлены на снижение глобального потепления."),
    ("IPCC", "IPCC — международная организация, публикующая научные оценки о состоянии климата и прогнозах."),
    ("вторичная переработка", "Вторичная переработка — превращение использованных материалов во вторичное сырьё для новых товаров."),
    ("транспорт и климат", "Автотранспорт — один из главных источников выбросов CO₂, особенно в городах."),
    ("разработка экологической политики", "Экологическая политика — это меры государств по регулированию воздействия на природу и климат."),
    ("компенсация выбросов", "Компенсация выбросов включает посадку деревьев или финансирование зелёных проектов в обмен на загрязнение."),
    ("талая вода", "Талая вода от тающих льдов может изменить морские течения и повлиять на климат регионов."),
    ("энергия солнца", "Солнечная энергия — чистый источник, преобразуемый в электричество с помощью панелей."),
    ("ветровая энергия", "Энергия ветра вырабатывается с помощью турбин и не производит вредных выбросов."),
    ("геотермальная энергия", "Геотермальная энергия использует тепло недр Земли для отопления и генерации электричества."),
    ("биомасса", "Биомасса — это органические материалы, используемые для производства энергии, например, древесина или сельхозотходы."),
    ("водная энергия", "Гидроэнергия вырабатывается с помощью плотин и турбин на реках, но может нарушать экосистемы."),
];
