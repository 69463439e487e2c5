//! The built-in topic catalog.
//!
//! Topics are fixed at build time and rotated by [`crate::topics`]. The
//! table is ordered by theme; order only matters for stats output, since
//! selection is random among the unused entries.

use crate::types::{ContentType, TopicDescriptor};

/// Categories that always get a page, even while they have no articles.
pub const DEFAULT_CATEGORIES: [&str; 5] = ["Whisky", "Reise", "Lifestyle", "Natur", "Urlaub"];

type Entry = (&'static str, &'static str, &'static [&'static str], ContentType);

use ContentType::{Article, Guide, Listicle, Review};

const TOPICS: &[Entry] = &[
    // Destillerien & Regionen
    ("Die besten Whisky-Destillerien auf Islay", "Whisky", &["Islay", "Distillery", "Single Malt", "Schottland"], Guide),
    ("Speyside entdecken: Schottlands Whisky-Herz", "Whisky", &["Speyside", "Distillery", "Schottland"], Guide),
    ("Highland Whisky: Raue Landschaft, weicher Geschmack", "Whisky", &["Highlands", "Distillery", "Single Malt"], Guide),
    ("Lowland Whiskys: Leicht, elegant und unterschaetzt", "Whisky", &["Lowlands", "Single Malt"], Article),
    ("Campbeltown: Die vergessene Whisky-Hauptstadt", "Whisky", &["Campbeltown", "Distillery"], Article),
    ("Die Geschichte von Lagavulin: 200 Jahre Torfrauch", "Whisky", &["Lagavulin", "Islay", "Single Malt"], Article),
    ("Ardbeg: Der intensivste Whisky der Welt?", "Whisky", &["Ardbeg", "Islay", "Tasting"], Review),
    ("Laphroaig: Warum Whisky-Fans diesen Dram lieben oder hassen", "Whisky", &["Laphroaig", "Islay", "Tasting"], Review),
    ("Bowmore: Tradition trifft Innovation", "Whisky", &["Bowmore", "Islay", "Distillery"], Article),
    ("Talisker: Der Whisky von der Insel Skye", "Whisky", &["Talisker", "Skye", "Single Malt"], Review),
    ("Glenfiddich vs. Glenlivet: Der grosse Vergleich", "Whisky", &["Glenfiddich", "Glenlivet", "Tasting"], Review),
    ("Macallan: Ist der Hype gerechtfertigt?", "Whisky", &["Macallan", "Speyside", "Single Malt"], Article),
    ("Bruichladdich und Octomore: Extremer Torf, einzigartiger Charakter", "Whisky", &["Bruichladdich", "Islay", "Tasting"], Review),
    ("Kilchoman: Islays juengste Destillerie", "Whisky", &["Kilchoman", "Islay", "Distillery"], Article),
    ("Port Ellen: Die Legende lebt wieder", "Whisky", &["Port Ellen", "Islay", "Distillery"], Article),
    ("Japanischer Whisky: Warum die Welt auf Japan schaut", "Whisky", &["Japan", "Whisky"], Guide),
    ("Irish Whiskey: Der sanfte Rivale aus Irland", "Whisky", &["Irish Whiskey", "Irland"], Guide),
    ("Bourbon vs. Scotch: Die grossen Unterschiede erklaert", "Whisky", &["Bourbon", "Scotch", "Whisky"], Article),
    ("Deutscher Whisky: Eine Szene im Aufbruch", "Whisky", &["Deutscher Whisky"], Article),
    ("Taiwanesischer Whisky: Kavalan und Co.", "Whisky", &["Taiwan", "Kavalan", "Whisky"], Article),

    // Tastings & Bewertungen
    ("Whisky-Tasting fuer Einsteiger: So geht's richtig", "Whisky", &["Tasting", "Einsteiger"], Guide),
    ("Die 10 besten Whiskys unter 50 Euro", "Whisky", &["Tasting", "Whisky"], Listicle),
    ("Whisky-Adventskalender: Die besten fuer die Weihnachtszeit", "Whisky", &["Whisky", "Weihnachten"], Listicle),
    ("Sherry-Fass vs. Bourbon-Fass: Wie das Fass den Whisky praegt", "Whisky", &["Tasting", "Whisky"], Article),
    ("Torfiger Whisky: Fuer wen ist er geeignet?", "Whisky", &["Tasting", "Islay", "Single Malt"], Article),
    ("Single Malt vs. Blended: Was ist besser?", "Whisky", &["Single Malt", "Whisky"], Article),
    ("Cask Strength Whisky: Ungefiltert und unverdunnt", "Whisky", &["Tasting", "Whisky"], Article),
    ("Die richtige Whisky-Lagerung: So bleibt dein Dram perfekt", "Whisky", &["Whisky", "Tipps"], Guide),
    ("Whisky und Schokolade: Das perfekte Pairing", "Lifestyle", &["Whisky", "Pairing", "Lifestyle"], Article),
    ("Whisky und Kaese: Ueberraschende Kombinationen", "Lifestyle", &["Whisky", "Pairing", "Lifestyle"], Article),
    ("Online Whisky Tasting: Die besten Anbieter im Vergleich", "Whisky", &["Tasting", "Online"], Listicle),
    ("Whisky-Glaeser: Welches Glas fuer welchen Whisky?", "Whisky", &["Whisky", "Zubehoer"], Guide),
    ("Whisky als Geldanlage: Lohnt sich das Investment?", "Whisky", &["Whisky", "Investment"], Article),

    // Reise: Schottland
    ("Schottland Roadtrip: Die beste Route fuer Whisky-Fans", "Reise", &["Schottland", "Roadtrip", "Whisky"], Guide),
    ("Edinburgh fuer Whisky-Liebhaber: Bars, Shops und Touren", "Reise", &["Edinburgh", "Schottland", "Whisky Bars"], Guide),
    ("Glasgow: Mehr als nur eine Durchreise", "Reise", &["Glasgow", "Schottland"], Guide),
    ("Die North Coast 500: Schottlands schoenste Kuestenstrasse", "Reise", &["Schottland", "Roadtrip", "NC500"], Guide),
    ("Mit der Faehre nach Schottland: Alle Routen und Tipps", "Reise", &["Schottland", "Faehre"], Guide),
    ("Wohnmobil-Reise durch Schottland: Was du wissen musst", "Reise", &["Schottland", "Wohnmobil"], Guide),
    ("Islay erreichen: Faehre, Flug oder beides?", "Reise", &["Islay", "Schottland", "Faehre"], Guide),
    ("Die schoensten B&Bs in Schottland", "Reise", &["Schottland", "B&B", "Hotels"], Listicle),
    ("Highland Games: Tradition und Spektakel erleben", "Reise", &["Schottland", "Highlands", "Kultur"], Article),
    ("Die Isle of Skye: Naturwunder und Whisky", "Reise", &["Skye", "Schottland", "Natur"], Guide),
    ("Schottische Kueche: Mehr als Haggis", "Reise", &["Schottland", "Essen", "Kultur"], Article),
    ("Mietwagen in Schottland: Linksverkehr und andere Tipps", "Reise", &["Schottland", "Mietwagen"], Guide),
    ("Die Orkney-Inseln: Highland Park und mehr", "Reise", &["Orkney", "Schottland", "Distillery"], Guide),
    ("Fruehling in Schottland: Die beste Reisezeit?", "Reise", &["Schottland", "Reisezeit"], Article),
    ("Herbst in den Highlands: Farben, Ruhe und guter Whisky", "Reise", &["Schottland", "Highlands", "Herbst"], Article),
    ("Packliste fuer Schottland: Das brauchst du wirklich", "Reise", &["Schottland", "Packliste", "Tipps"], Guide),

    // Reise: Irland
    ("Dublin fuer Whiskey-Liebhaber: Die besten Pubs und Destillerien", "Reise", &["Dublin", "Irland", "Irish Whiskey"], Guide),
    ("Irlands Whiskey Trail: Von Dublin bis Galway", "Reise", &["Irland", "Irish Whiskey", "Roadtrip"], Guide),
    ("Teeling Distillery Dublin: Ein Besuch lohnt sich", "Reise", &["Teeling Whiskey", "Dublin", "Irland"], Article),
    ("Wild Atlantic Way: Irlands spektakulaerste Kuestenstrasse", "Reise", &["Irland", "Roadtrip"], Guide),

    // Reise: Andere Laender
    ("Kentucky Bourbon Trail: Ein Roadtrip durch die USA", "Reise", &["USA", "Bourbon", "Roadtrip"], Guide),
    ("Whisky-Reise nach Japan: Suntory, Nikka und mehr", "Reise", &["Japan", "Whisky", "Reise"], Guide),
    ("Whisky-Regionen der Welt: Eine Uebersicht", "Reise", &["Whisky", "Reise", "Welt"], Guide),

    // Natur & Outdoor
    ("Wandern in den Highlands: Die 5 schoensten Routen", "Natur", &["Schottland", "Highlands", "Wandern"], Listicle),
    ("Wildlife in Schottland: Hirsche, Adler und Robben", "Natur", &["Schottland", "Natur", "Wildlife"], Article),
    ("Die schoensten Straende Schottlands", "Natur", &["Schottland", "Natur", "Straende"], Listicle),
    ("Loch Ness und mehr: Schottlands geheimnisvolle Seen", "Natur", &["Schottland", "Natur", "Loch Ness"], Article),
    ("Highland Rinder: Wo man sie am besten sieht", "Natur", &["Schottland", "Highland Rinder", "Natur"], Article),

    // Lifestyle
    ("Whisky-Cocktails: Mehr als nur pur geniessen", "Lifestyle", &["Whisky", "Cocktails", "Lifestyle"], Article),
    ("Burns Night feiern: Tradition und Rezepte", "Lifestyle", &["Burns Night", "Schottland", "Kultur"], Article),
    ("Die besten Whisky-Buecher fuer Einsteiger und Kenner", "Lifestyle", &["Whisky", "Buecher"], Listicle),
    ("Whisky-Geschenke: Die besten Ideen fuer jeden Anlass", "Lifestyle", &["Whisky", "Geschenke"], Listicle),
    ("Whisky und Zigarren: Eine klassische Kombination", "Lifestyle", &["Whisky", "Zigarren", "Lifestyle"], Article),
    ("Die schoensten Whisky-Bars in Deutschland", "Lifestyle", &["Whisky Bars", "Deutschland"], Listicle),
    ("Whisky als Hobby: Was du zum Start brauchst", "Lifestyle", &["Whisky", "Einsteiger"], Guide),

    // Urlaub
    ("Familienurlaub in Schottland: Tipps fuer Eltern (und Whisky-Fans)", "Urlaub", &["Schottland", "Familienurlaub"], Guide),
    ("Reiseversicherung fuer Schottland: Was du wirklich brauchst", "Urlaub", &["Reiseversicherung", "Schottland"], Guide),
    ("Guenstig nach Schottland: Spartipps fuer die Whisky-Reise", "Urlaub", &["Schottland", "Spartipps", "Budget"], Guide),
    ("Luxusurlaub in Schottland: Schlosshotels und Fine Dining", "Urlaub", &["Schottland", "Luxus", "Hotels"], Guide),
    ("Schottland im Winter: Lohnt sich eine Reise?", "Urlaub", &["Schottland", "Winter", "Reisezeit"], Article),
];

/// The full catalog as owned descriptors, in table order.
pub fn whisky_topics() -> Vec<TopicDescriptor> {
    TOPICS
        .iter()
        .map(|(title, category, tags, content_type)| TopicDescriptor {
            title: title.to_string(),
            category: category.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            content_type: *content_type,
        })
        .collect()
}
