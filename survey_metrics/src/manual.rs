/*!

This is the long-form manual for `survey_metrics` and `cowork-survey`.

## Metrics

* **NPS** (Net Promoter Score): the answers to "how likely are you to recommend
  us" (0 to 10) are split into detractors (0 to 6), passives (7 and 8) and
  promoters (9 and 10). The score is the percentage of promoters minus the
  percentage of detractors, between -100 and 100. Responses without an answer
  are not counted.
* **NBS**: the average rating (1 to 5) of each section of the survey. The
  overall NBS is the mean of the six section averages.
* **Value for price**: the average of the `value_price` rating.

Ratings of 0, missing ratings and values that are not numbers mean "not
rated": they are left out of the averages. An average of 0 therefore means
that nothing was rated.

Averages are read as follows:

| average    | status                 |
|------------|------------------------|
| 4.5 and up | Competitive excellence |
| 4.0 to 4.5 | Strong                 |
| 3.0 to 4.0 | Needs improvement      |
| below 3.0  | Operational risk       |

## Input formats

### `json`

A JSON array of responses, or a single response object. This is also the
format of the store and of `cowork-survey export`.

```text
[
  {
    "nps": 9,
    "internet_0": 4, "internet_1": 5, "internet_2": 3,
    "chairs_0": 4, "chairs_1": 4, "chairs_2": 5,
    "value_price": 4,
    "liked_most": "The quiet room",
    "timestamp": "2026-10-19T08:12:00Z",
    "month": "October 2026"
  }
]
```

The rating fields are named after the section and the position of the item in
the section, starting at 0: `internet`, `chairs`, `vibe`, `staff`, `catering`,
`clean`. Fields that are not known are kept when the response is stored.

### `msforms`

The spreadsheet (xlsx) downloaded from the online sheet that receives the
submissions. The first row holds the field names above, each following row is
one response. Empty cells are unanswered questions. When the workbook has more
than one worksheet, its name must be given with `--excel-worksheet-name`.

## Configuration

`cowork-survey` works without configuration: the store is the
`survey_responses.json` file of the current directory. A configuration file in
JSON can be passed with `--config`:

```text
{
  "outputSettings": { "title": "Downtown branch", "outputDirectory": "reports" },
  "storeDirectory": "data",
  "storeKey": "survey_responses",
  "sinkUrl": "https://example.org/submit",
  "sinkTimeoutSecs": 10,
  "dashboardPassword": "change me",
  "monthOrder": "chronological",
  "demoCount": 24,
  "demoSeed": 7
}
```

All the fields are optional. Paths are relative to the directory of the
configuration file. The options given on the command line take precedence.

 - `monthOrder`: `firstSeen` (the default) lists the months of the trend in
   the order they first appear in the responses; `chronological` sorts them by
   their earliest response.
 - `dashboardPassword`: when set, `report`, `import` and `export` ask for
   `--password`. This only keeps casual visitors away from the results.
 - `sinkUrl`: every new response is also sent there. The answer of the server
   is not checked; a failure to send is reported but the response stays in the
   local store.
 - `demoCount`, `demoSeed`: the generated responses of `report --demo`. The
   same seed always gives the same answers.

## Summary

`cowork-survey report --out <file>` writes the dashboard as JSON: a `config`
block (title, month filter, month order) and a `results` block (response
count, NPS split, NBS, value for price, sections with their status, the three
lowest sections, the monthly trend and the latest five responses). A summary
given with `--reference` is compared with the computed one and any difference
is printed.

 */
