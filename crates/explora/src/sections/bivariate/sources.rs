//! Literal source text embedded in cells at full verbosity.
//!
//! The registry is authored by hand rather than recovered at runtime: each
//! constant below holds the notebook source of one emittable function, and
//! the per-subsection slices list those functions in dependency order. Where
//! a function's body refers to its owning type, the qualifier is recorded so
//! call sites can be scrubbed before emission.

/// One emittable analysis function.
pub(crate) struct EmittableFunction {
    pub source: &'static str,
    /// Owning-type prefix removed from every occurrence in `source`.
    pub strip_qualifier: Option<&'static str>,
}

/// Render the full-verbosity cell body: every dependency's source followed by
/// the entry call, separated by blank lines.
pub(crate) fn render_with_sources(functions: &[EmittableFunction], call: &str) -> String {
    let mut blocks: Vec<String> = functions
        .iter()
        .map(|function| match function.strip_qualifier {
            Some(qualifier) => function.source.replace(qualifier, ""),
            None => function.source.to_string(),
        })
        .collect();
    blocks.push(call.to_string());
    blocks.join("\n\n")
}

// ---------------------------------------------------------------------------
// Pairplot
// ---------------------------------------------------------------------------

const PLOT_PAIRPLOT: EmittableFunction = EmittableFunction {
    source: r#"def plot_pairplot(df, columns=None, columns_x=None, columns_y=None, color_col=None):
    if columns_x is None or columns_y is None:
        columns_x = columns_y = list(df.columns) if columns is None else columns
    sns.pairplot(
        df,
        x_vars=columns_x,
        y_vars=columns_y,
        hue=color_col,
    )
    plt.show()"#,
    strip_qualifier: None,
};

pub(crate) const PAIRPLOT_FUNCTIONS: &[EmittableFunction] = &[PLOT_PAIRPLOT];

pub(crate) const PAIRPLOT_IMPORTS: &[&str] = &[
    "import seaborn as sns",
    "import matplotlib.pyplot as plt",
    "%matplotlib inline",
];

// ---------------------------------------------------------------------------
// Correlations
// ---------------------------------------------------------------------------

const DEFAULT_CORRELATIONS: EmittableFunction = EmittableFunction {
    source: r#"def default_correlations():
    return ["pearson", "spearman", "kendall"]"#,
    strip_qualifier: None,
};

const GET_COLUMNS_X_Y: EmittableFunction = EmittableFunction {
    source: r#"def _get_columns_x_y(df, columns=None, columns_x=None, columns_y=None):
    if columns_x is None:
        columns_x = list(df.columns) if columns is None else columns
        columns_x = [col for col in columns_x if is_numeric(df[col])]
    if columns_y is None:
        columns_y = columns_x
    return columns_x, columns_y"#,
    strip_qualifier: None,
};

const PLOT_CORRELATION: EmittableFunction = EmittableFunction {
    source: r#"def plot_correlation(df, method, columns=None, columns_x=None, columns_y=None):
    columns_x, columns_y = CorrelationPlot._get_columns_x_y(
        df, columns=columns, columns_x=columns_x, columns_y=columns_y
    )
    corr = df[list(dict.fromkeys(columns_x + columns_y))].corr(method=method)
    sns.heatmap(corr.loc[columns_x, columns_y], annot=True, center=0, cmap="coolwarm")
    plt.title(method.capitalize())
    plt.show()"#,
    strip_qualifier: Some("CorrelationPlot."),
};

const PLOT_CORRELATIONS: EmittableFunction = EmittableFunction {
    source: r#"def plot_correlations(df, columns=None, columns_x=None, columns_y=None):
    for method in CorrelationPlot.default_correlations():
        CorrelationPlot.plot_correlation(
            df, method, columns=columns, columns_x=columns_x, columns_y=columns_y
        )"#,
    strip_qualifier: Some("CorrelationPlot."),
};

pub(crate) const CORRELATIONS_FUNCTIONS: &[EmittableFunction] = &[
    DEFAULT_CORRELATIONS,
    GET_COLUMNS_X_Y,
    PLOT_CORRELATION,
    PLOT_CORRELATIONS,
];

pub(crate) const CORRELATIONS_IMPORTS: &[&str] = &[
    "import seaborn as sns",
    "import matplotlib.pyplot as plt",
    "%matplotlib inline",
    "from explora.data_types import is_numeric",
];

// ---------------------------------------------------------------------------
// Contingency tables
// ---------------------------------------------------------------------------

const CONTINGENCY_TABLES: EmittableFunction = EmittableFunction {
    source: r#"def contingency_tables(df, columns=None, columns_x=None, columns_y=None, columns_pairs=None):
    if columns_pairs is None:
        if columns_x is None or columns_y is None:
            columns = list(df.columns) if columns is None else columns
            columns_pairs = list(itertools.combinations(columns, 2))
        else:
            columns_pairs = list(itertools.product(columns_x, columns_y))
    for column1, column2 in columns_pairs:
        ContingencyTable.contingency_table(df, column1, column2)"#,
    strip_qualifier: Some("ContingencyTable."),
};

const CONTINGENCY_TABLE: EmittableFunction = EmittableFunction {
    source: r#"def contingency_table(df, column1, column2):
    table = pd.crosstab(df[column1], df[column2])
    display(table.style.background_gradient(cmap="Blues"))"#,
    strip_qualifier: None,
};

pub(crate) const CONTINGENCY_FUNCTIONS: &[EmittableFunction] =
    &[CONTINGENCY_TABLES, CONTINGENCY_TABLE];

pub(crate) const CONTINGENCY_IMPORTS: &[&str] = &[
    "import itertools",
    "import pandas as pd",
    "from IPython.display import display",
];
