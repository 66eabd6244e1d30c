//! Enumerations mapping the site's UI labels and API constants.

/// Shelf categories available on the website.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookShelf {
    Comic,
    Book,
    Magazine,
}

impl BookShelf {
    /// URL slug used by the shelf endpoint.
    pub fn slug(self) -> &'static str {
        match self {
            BookShelf::Comic => "comic",
            BookShelf::Book => "book",
            BookShelf::Magazine => "magazine",
        }
    }
}

/// Numeric labels used by the API when tagging books.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookLabel {
    Favorite,
    Wishlist,
    Owned,
    Tradable,
    Loaned,
}

impl BookLabel {
    pub fn code(self) -> u8 {
        match self {
            BookLabel::Favorite => 8,
            BookLabel::Wishlist => 9,
            BookLabel::Owned => 6,
            BookLabel::Tradable => 10,
            BookLabel::Loaned => 11,
        }
    }
}

/// Search modes accepted by the book search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookSearch {
    All,
    Isbn,
    Author,
    Publisher,
    #[default]
    Title,
    Tags,
}

impl BookSearch {
    /// `tipo:` slug in the search URL.
    pub fn slug(self) -> &'static str {
        match self {
            BookSearch::All => "geral",
            BookSearch::Isbn => "isbn",
            BookSearch::Author => "autor",
            BookSearch::Publisher => "editora",
            BookSearch::Title => "titulo",
            BookSearch::Tags => "tags",
        }
    }
}

/// Status codes for a user's relationship with a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookStatus {
    Read,
    CurrentlyReading,
    WantToRead,
    Rereading,
    Abandoned,
}

impl BookStatus {
    pub fn code(self) -> u8 {
        match self {
            BookStatus::Read => 1,
            BookStatus::CurrentlyReading => 2,
            BookStatus::WantToRead => 3,
            BookStatus::Rereading => 4,
            BookStatus::Abandoned => 5,
        }
    }
}

/// URL slugs for reader listings of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookUserStatus {
    Read,
    CurrentlyReading,
    WantToRead,
    Rereading,
    Abandoned,
    Favorited,
    Tradable,
    Wishlisted,
    Rated,
}

impl BookUserStatus {
    pub fn slug(self) -> &'static str {
        match self {
            BookUserStatus::Read => "leram",
            BookUserStatus::CurrentlyReading => "lendo",
            BookUserStatus::WantToRead => "vaoler",
            BookUserStatus::Rereading => "relendo",
            BookUserStatus::Abandoned => "abandonaram",
            BookUserStatus::Favorited => "favoritos",
            BookUserStatus::Tradable => "trocam",
            BookUserStatus::Wishlisted => "desejam",
            BookUserStatus::Rated => "avaliaram",
        }
    }
}

/// Filter options for a user's virtual bookcase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookcaseOption {
    All,
    Read,
    CurrentlyReading,
    WantToRead,
    Rereading,
    Abandoned,
    Owned,
    Ebook,
    Favorite,
    Wishlist,
    Tradable,
    Loaned,
    ReadingGoal,
    Rated,
    Reviewed,
    Audiobook,
}

impl BookcaseOption {
    /// `shelf_id:` value in the bookcase endpoint.
    pub fn code(self) -> u8 {
        match self {
            BookcaseOption::All => 0,
            BookcaseOption::Read => 1,
            BookcaseOption::CurrentlyReading => 2,
            BookcaseOption::WantToRead => 3,
            BookcaseOption::Rereading => 4,
            BookcaseOption::Abandoned => 5,
            BookcaseOption::Owned => 6,
            BookcaseOption::Ebook => 7,
            BookcaseOption::Favorite => 8,
            BookcaseOption::Wishlist => 9,
            BookcaseOption::Tradable => 10,
            BookcaseOption::Loaned => 11,
            BookcaseOption::ReadingGoal => 12,
            BookcaseOption::Rated => 13,
            BookcaseOption::Reviewed => 14,
            BookcaseOption::Audiobook => 15,
        }
    }
}

/// Types of relationship between users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsersRelation {
    Friends,
    Following,
    Followers,
}

impl UsersRelation {
    pub fn slug(self) -> &'static str {
        match self {
            UsersRelation::Friends => "amigos",
            UsersRelation::Following => "seguidos",
            UsersRelation::Followers => "seguidores",
        }
    }
}

/// Gender codes accepted by the user search filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserGender {
    Male,
    Female,
}

impl UserGender {
    pub fn code(self) -> &'static str {
        match self {
            UserGender::Male => "M",
            UserGender::Female => "F",
        }
    }
}

/// Brazilian state abbreviations used in user profiles and search filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrazilianState {
    Acre,
    Alagoas,
    Amapa,
    Amazonas,
    Bahia,
    Ceara,
    DistritoFederal,
    EspiritoSanto,
    Goias,
    Maranhao,
    MatoGrosso,
    MatoGrossoDoSul,
    MinasGerais,
    Para,
    Paraiba,
    Parana,
    Pernambuco,
    Piaui,
    RioDeJaneiro,
    RioGrandeDoNorte,
    RioGrandeDoSul,
    Rondonia,
    Roraima,
    SantaCatarina,
    SaoPaulo,
    Sergipe,
    Tocantins,
}

impl BrazilianState {
    /// Two-letter UF code used in search URLs.
    pub fn code(self) -> &'static str {
        match self {
            BrazilianState::Acre => "AC",
            BrazilianState::Alagoas => "AL",
            BrazilianState::Amapa => "AP",
            BrazilianState::Amazonas => "AM",
            BrazilianState::Bahia => "BA",
            BrazilianState::Ceara => "CE",
            BrazilianState::DistritoFederal => "DF",
            BrazilianState::EspiritoSanto => "ES",
            BrazilianState::Goias => "GO",
            BrazilianState::Maranhao => "MA",
            BrazilianState::MatoGrosso => "MT",
            BrazilianState::MatoGrossoDoSul => "MS",
            BrazilianState::MinasGerais => "MG",
            BrazilianState::Para => "PA",
            BrazilianState::Paraiba => "PB",
            BrazilianState::Parana => "PR",
            BrazilianState::Pernambuco => "PE",
            BrazilianState::Piaui => "PI",
            BrazilianState::RioDeJaneiro => "RJ",
            BrazilianState::RioGrandeDoNorte => "RN",
            BrazilianState::RioGrandeDoSul => "RS",
            BrazilianState::Rondonia => "RO",
            BrazilianState::Roraima => "RR",
            BrazilianState::SantaCatarina => "SC",
            BrazilianState::SaoPaulo => "SP",
            BrazilianState::Sergipe => "SE",
            BrazilianState::Tocantins => "TO",
        }
    }
}
